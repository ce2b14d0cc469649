//! Check completion order must never change which prompt is selected or the
//! order of its reasons.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use common::FailingDetails;
use interactions_core::common::AuthorizationContext;
use interactions_core::domains::interactions::{
    evaluate_prompt, resolve_prompt, Check, CheckPredicate, Details, DetailsResolver, Prompt,
    Resolution,
};
use serde_json::Value;

/// Predicate that answers after a delay and records when it finished
struct DelayedCheck {
    reason: &'static str,
    delay: Duration,
    result: bool,
    completed: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl CheckPredicate for DelayedCheck {
    async fn check(&self, _ctx: &AuthorizationContext) -> Result<bool> {
        tokio::time::sleep(self.delay).await;
        self.completed.lock().unwrap().push(self.reason);
        Ok(self.result)
    }
}

/// Details resolver that tags its output with the check reason after a delay
struct DelayedDetails {
    reason: &'static str,
    delay: Duration,
}

#[async_trait]
impl DetailsResolver for DelayedDetails {
    async fn details(&self, _ctx: &AuthorizationContext) -> Result<Details> {
        tokio::time::sleep(self.delay).await;
        let mut details = Details::new();
        details.insert("last".to_string(), Value::String(self.reason.to_string()));
        Ok(details)
    }
}

struct FailingCheck;

#[async_trait]
impl CheckPredicate for FailingCheck {
    async fn check(&self, _ctx: &AuthorizationContext) -> Result<bool> {
        Err(anyhow!("account lookup failed"))
    }
}

const REASONS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

/// Random delays, with every other check failing
fn randomized_prompt(
    name: &str,
    rng: &mut fastrand::Rng,
    completed: &Arc<Mutex<Vec<&'static str>>>,
) -> Prompt {
    let checks = REASONS
        .iter()
        .enumerate()
        .map(|(i, &reason)| {
            Check::new(
                reason,
                DelayedCheck {
                    reason,
                    delay: Duration::from_millis(rng.u64(0..50)),
                    result: i % 2 == 0,
                    completed: completed.clone(),
                },
            )
            .with_error(format!("{}_required", reason))
            .with_details(DelayedDetails {
                reason,
                delay: Duration::from_millis(rng.u64(0..50)),
            })
        })
        .collect();
    Prompt::new(name, checks)
}

#[tokio::test(start_paused = true)]
async fn test_reasons_follow_configured_order_for_any_completion_order() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut completion_orders = Vec::new();

    for _ in 0..32 {
        let completed = Arc::new(Mutex::new(Vec::new()));
        let prompt = randomized_prompt("consent", &mut rng, &completed);

        let found = evaluate_prompt(&prompt, &AuthorizationContext::default())
            .await
            .unwrap()
            .expect("failing checks select the prompt");

        assert_eq!(found.decision.reasons, vec!["a", "c", "e"]);
        assert_eq!(found.primary.error, "a_required");
        // Later failing checks overwrite earlier details on collision
        assert_eq!(found.decision.details.get("last"), Some(&Value::String("e".to_string())));

        let order = completed.lock().unwrap().clone();
        assert_eq!(order.len(), REASONS.len(), "every check completes");
        completion_orders.push(order);
    }

    completion_orders.sort();
    completion_orders.dedup();
    assert!(
        completion_orders.len() > 1,
        "delays should produce different completion orders"
    );
}

#[tokio::test(start_paused = true)]
async fn test_selected_prompt_independent_of_completion_order() {
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..16 {
        let completed = Arc::new(Mutex::new(Vec::new()));
        let passing = Prompt::new(
            "login",
            vec![Check::new(
                "slow_pass",
                DelayedCheck {
                    reason: "slow_pass",
                    delay: Duration::from_millis(rng.u64(0..50)),
                    result: false,
                    completed: completed.clone(),
                },
            )],
        );
        let prompts = vec![
            passing,
            randomized_prompt("consent", &mut rng, &completed),
            randomized_prompt("select_account", &mut rng, &completed),
        ];

        let resolution = resolve_prompt(&prompts, &AuthorizationContext::default())
            .await
            .unwrap();

        let Resolution::Found(found) = resolution else {
            panic!("expected the consent prompt");
        };
        assert_eq!(found.decision.name, "consent");
        assert_eq!(found.decision.reasons, vec!["a", "c", "e"]);

        // login and consent ran; select_account was never evaluated
        assert_eq!(completed.lock().unwrap().len(), 1 + REASONS.len());
    }
}

#[tokio::test]
async fn test_check_error_fails_the_whole_prompt() {
    let prompt = Prompt::new(
        "login",
        vec![
            Check::new("fine", |_: &AuthorizationContext| true),
            Check::new("broken", FailingCheck),
        ],
    );

    let result = evaluate_prompt(&prompt, &AuthorizationContext::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_check_details_error_fails_the_whole_prompt() {
    let prompt = Prompt::new(
        "consent",
        vec![
            Check::new("fine", |_: &AuthorizationContext| true),
            Check::new("broken_details", |_: &AuthorizationContext| true)
                .with_details(FailingDetails),
        ],
    );

    let result = evaluate_prompt(&prompt, &AuthorizationContext::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_prompt_details_error_fails_the_whole_prompt() {
    let prompt = Prompt::new(
        "consent",
        vec![Check::new("fine", |_: &AuthorizationContext| true)],
    )
    .with_details(FailingDetails);

    let result = evaluate_prompt(&prompt, &AuthorizationContext::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_details_of_passing_checks_are_never_resolved() {
    let prompt = Prompt::new(
        "consent",
        vec![
            Check::new("satisfied", |_: &AuthorizationContext| false).with_details(FailingDetails),
            Check::new("needed", |_: &AuthorizationContext| true),
        ],
    );

    let found = evaluate_prompt(&prompt, &AuthorizationContext::default())
        .await
        .unwrap()
        .expect("the failing check selects the prompt");
    assert_eq!(found.decision.reasons, vec!["needed"]);
}
