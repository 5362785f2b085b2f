//! Scheduler properties under randomized detector latency.
//!
//! - one outcome per request, in input order, whatever the completion order
//! - never more than `concurrency` detector calls in flight
//! - per-URL failures stay local to their row

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::MockBackend;
use mass_detect::{DetectionRequest, DetectorInvoker, Scheduler};

fn requests(n: usize) -> Vec<DetectionRequest> {
    (0..n)
        .map(|i| {
            if i % 7 == 3 {
                DetectionRequest::new(format!("fail-{i}.example"))
            } else {
                DetectionRequest::new(format!("site-{i}.example"))
            }
        })
        .collect()
}

fn scheduler(backend: Arc<MockBackend>, concurrency: usize) -> Scheduler {
    let invoker = DetectorInvoker::new(backend, Duration::from_secs(10));
    Scheduler::new(invoker, concurrency)
}

#[tokio::test]
async fn test_outcomes_follow_input_order() {
    let backend = Arc::new(MockBackend::new(0, 15));
    let input = requests(50);
    let expected: Vec<String> = input.iter().map(|r| r.url.clone()).collect();

    let outcomes = scheduler(Arc::clone(&backend), 8).run_all(input).await;

    let urls: Vec<&str> = outcomes.iter().map(|o| o.url()).collect();
    assert_eq!(urls, expected);
    assert_eq!(backend.calls(), 50);

    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.is_success(), i % 7 != 3, "row {i}: {outcome:?}");
    }
    // Each success reports its own host, so rows were not swapped
    let technologies = outcomes[10].technologies().unwrap();
    assert!(technologies.contains_key("Tech-site-10.example"));
    assert_eq!(outcomes[10].final_url(), Some("http://site-10.example/"));
}

#[tokio::test]
async fn test_concurrency_never_exceeds_limit() {
    for limit in [1, 5, 20] {
        let backend = Arc::new(MockBackend::new(5, 20));
        let outcomes = scheduler(Arc::clone(&backend), limit)
            .run_all(requests(50))
            .await;

        assert_eq!(outcomes.len(), 50);
        assert!(
            backend.max_active() <= limit,
            "limit {limit}, observed {}",
            backend.max_active()
        );
        // Every call sleeps, so the first `limit` requests overlap
        assert_eq!(backend.max_active(), limit);
    }
}

#[tokio::test]
async fn test_limit_above_batch_size() {
    let backend = Arc::new(MockBackend::new(5, 10));
    let outcomes = scheduler(Arc::clone(&backend), 100)
        .run_all(requests(4))
        .await;
    assert_eq!(outcomes.len(), 4);
    assert!(backend.max_active() <= 4);
}

#[tokio::test]
async fn test_failure_detail_recorded() {
    let backend = Arc::new(MockBackend::new(0, 0));
    let outcomes = scheduler(backend, 2)
        .run_all(vec![DetectionRequest::new("fail.example")])
        .await;
    let detail = outcomes[0].error_detail().unwrap();
    assert!(detail.contains("exit code 1"), "{detail}");
    assert!(detail.contains("could not reach http://fail.example"), "{detail}");
}
