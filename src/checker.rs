//! Form controller: owns one form's symptoms and its request state.
//!
//! State machine: `Idle → Loading → Success | Failure`, and back to `Loading`
//! on the next submission. `Loading` is the single busy flag: while it is set,
//! further submissions and symptom edits are refused, so a form never has more
//! than one analysis in flight.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::{build_symptom_description, AnalysisService};
use crate::collector::{CollectorError, SymptomCollector};
use crate::models::{AnalysisResult, Severity, UserInputSymptom};

pub const EMPTY_SUBMISSION_MESSAGE: &str =
    "Please add at least one symptom to receive an analysis.";

pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "Sorry, an unexpected error occurred. Please check your connection and try again later.";

/// What the result panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckerState {
    Idle,
    Loading,
    Success(AnalysisResult),
    Failure(String),
}

pub type SharedChecker = Arc<Mutex<SymptomChecker>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("{}", EMPTY_SUBMISSION_MESSAGE)]
    NoSymptoms,
    #[error("An analysis is already in progress")]
    InFlight,
}

#[derive(Debug, Default)]
pub struct SymptomChecker {
    collector: SymptomCollector,
    state: CheckerState,
}

impl Default for CheckerState {
    fn default() -> Self {
        Self::Idle
    }
}

impl SymptomChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CheckerState {
        &self.state
    }

    pub fn collector(&self) -> &SymptomCollector {
        &self.collector
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CheckerState::Loading)
    }

    /// Whether the check button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.collector.is_empty()
    }

    pub fn select_severity(&mut self, severity: Severity) -> Result<(), CollectorError> {
        self.ensure_idle()?;
        self.collector.select_severity(severity);
        Ok(())
    }

    pub fn add_symptom(
        &mut self,
        name: &str,
        severity: Severity,
    ) -> Result<&UserInputSymptom, CollectorError> {
        self.ensure_idle()?;
        self.collector.add(name, severity)
    }

    pub fn remove_symptom(
        &mut self,
        index: usize,
    ) -> Result<Option<UserInputSymptom>, CollectorError> {
        self.ensure_idle()?;
        Ok(self.collector.remove(index))
    }

    /// Start a submission.
    ///
    /// On success the state becomes `Loading` and the symptom description to
    /// analyze is returned. An empty list moves straight to
    /// `Failure(EMPTY_SUBMISSION_MESSAGE)`; an in-flight request leaves the
    /// state untouched.
    pub fn begin_check(&mut self) -> Result<String, CheckError> {
        if self.is_loading() {
            return Err(CheckError::InFlight);
        }
        if self.collector.is_empty() {
            self.state = CheckerState::Failure(EMPTY_SUBMISSION_MESSAGE.to_string());
            return Err(CheckError::NoSymptoms);
        }

        self.state = CheckerState::Loading;
        Ok(build_symptom_description(self.collector.symptoms()))
    }

    /// Leave `Loading` with the outcome of the analysis.
    pub fn finish_check(&mut self, outcome: Result<AnalysisResult, String>) {
        self.state = match outcome {
            Ok(result) => CheckerState::Success(result),
            Err(message) => CheckerState::Failure(message),
        };
    }

    fn ensure_idle(&self) -> Result<(), CollectorError> {
        if self.is_loading() {
            Err(CollectorError::Busy)
        } else {
            Ok(())
        }
    }
}

/// Run the analysis service on its own task.
///
/// A task that dies instead of returning yields `UNEXPECTED_ERROR_MESSAGE`.
pub async fn analyze_guarded(
    service: Arc<dyn AnalysisService>,
    description: String,
) -> Result<AnalysisResult, String> {
    let task = tokio::spawn(async move { service.analyze(&description).await });

    match task.await {
        Ok(result) => Ok(result),
        Err(e) => {
            tracing::error!(error = %e, "Analysis task failed unexpectedly");
            Err(UNEXPECTED_ERROR_MESSAGE.to_string())
        }
    }
}

/// Run one full submission for a shared checker.
///
/// The lock is released while the service call is outstanding so the page
/// can still be rendered (showing `Loading`). Completion is written by a
/// detached task that owns the checker, so the session leaves `Loading`
/// even if the caller stops waiting.
pub async fn run_check(
    checker: SharedChecker,
    service: Arc<dyn AnalysisService>,
) -> Result<(), CheckError> {
    let description = checker.lock().await.begin_check()?;
    tracing::debug!(symptoms = %description, "Submitting symptoms for analysis");

    let completion = tokio::spawn(async move {
        let outcome = analyze_guarded(service, description).await;
        checker.lock().await.finish_check(outcome);
    });

    if let Err(e) = completion.await {
        tracing::error!(error = %e, "Check completion task failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::analysis::{BoxFuture, StaticAnalysisService};
    use crate::models::RiskLevel;

    /// Answers after a delay, long enough for a caller to give up.
    struct SlowService(Duration);

    impl AnalysisService for SlowService {
        fn analyze<'a>(&'a self, _symptoms: &'a str) -> BoxFuture<'a, AnalysisResult> {
            Box::pin(async move {
                tokio::time::sleep(self.0).await;
                AnalysisResult::new(RiskLevel::Low, "Not a diagnosis.")
            })
        }
    }

    fn shared() -> SharedChecker {
        Arc::new(Mutex::new(SymptomChecker::new()))
    }

    struct PanickingService;

    impl AnalysisService for PanickingService {
        fn analyze<'a>(&'a self, symptoms: &'a str) -> BoxFuture<'a, AnalysisResult> {
            Box::pin(async move {
                if !symptoms.is_empty() {
                    panic!("service exploded");
                }
                AnalysisResult::fallback()
            })
        }
    }

    fn low_result() -> AnalysisResult {
        AnalysisResult::new(RiskLevel::Low, "Not a diagnosis.")
    }

    #[test]
    fn new_checker_is_idle() {
        let checker = SymptomChecker::new();
        assert_eq!(checker.state(), &CheckerState::Idle);
        assert!(!checker.can_submit());
    }

    #[test]
    fn empty_submission_fails_with_message() {
        let mut checker = SymptomChecker::new();
        assert_eq!(checker.begin_check(), Err(CheckError::NoSymptoms));
        assert_eq!(
            checker.state(),
            &CheckerState::Failure(EMPTY_SUBMISSION_MESSAGE.to_string())
        );
    }

    #[test]
    fn begin_check_enters_loading_and_builds_description() {
        let mut checker = SymptomChecker::new();
        checker.add_symptom("chest pain", Severity::Severe).unwrap();
        let description = checker.begin_check().unwrap();
        assert_eq!(description, "Severe chest pain");
        assert!(checker.is_loading());
        assert!(!checker.can_submit());
    }

    #[test]
    fn second_submission_while_loading_is_refused() {
        let mut checker = SymptomChecker::new();
        checker.add_symptom("cough", Severity::Mild).unwrap();
        checker.begin_check().unwrap();
        assert_eq!(checker.begin_check(), Err(CheckError::InFlight));
        assert!(checker.is_loading());
    }

    #[test]
    fn edits_are_refused_while_loading() {
        let mut checker = SymptomChecker::new();
        checker.add_symptom("cough", Severity::Mild).unwrap();
        checker.begin_check().unwrap();
        assert_eq!(
            checker.add_symptom("fever", Severity::Mild).unwrap_err(),
            CollectorError::Busy
        );
        assert_eq!(checker.remove_symptom(0), Err(CollectorError::Busy));
        assert_eq!(checker.select_severity(Severity::Severe), Err(CollectorError::Busy));
        assert_eq!(checker.collector().len(), 1);
    }

    #[test]
    fn finish_check_leaves_loading() {
        let mut checker = SymptomChecker::new();
        checker.add_symptom("cough", Severity::Mild).unwrap();
        checker.begin_check().unwrap();
        checker.finish_check(Ok(low_result()));
        assert_eq!(checker.state(), &CheckerState::Success(low_result()));
        assert!(checker.can_submit());

        checker.begin_check().unwrap();
        checker.finish_check(Err("boom".into()));
        assert_eq!(checker.state(), &CheckerState::Failure("boom".into()));
    }

    #[tokio::test]
    async fn run_check_stores_service_result() {
        let checker = shared();
        checker
            .lock()
            .await
            .add_symptom("headache", Severity::Moderate)
            .unwrap();

        let service = Arc::new(StaticAnalysisService::new(low_result()));
        run_check(checker.clone(), service.clone()).await.unwrap();

        assert_eq!(service.requests(), vec!["Moderate headache".to_string()]);
        assert_eq!(
            checker.lock().await.state(),
            &CheckerState::Success(low_result())
        );
    }

    #[tokio::test]
    async fn run_check_with_no_symptoms_never_calls_service() {
        let checker = shared();
        let service = Arc::new(StaticAnalysisService::new(low_result()));

        let err = run_check(checker.clone(), service.clone()).await.unwrap_err();
        assert_eq!(err, CheckError::NoSymptoms);
        assert_eq!(service.call_count(), 0);
        assert_eq!(
            checker.lock().await.state(),
            &CheckerState::Failure(EMPTY_SUBMISSION_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn run_check_reports_unexpected_failure() {
        let checker = shared();
        checker.lock().await.add_symptom("cough", Severity::Mild).unwrap();

        run_check(checker.clone(), Arc::new(PanickingService)).await.unwrap();

        let guard = checker.lock().await;
        assert_eq!(
            guard.state(),
            &CheckerState::Failure(UNEXPECTED_ERROR_MESSAGE.to_string())
        );
        assert!(!guard.is_loading());
    }

    #[tokio::test]
    async fn abandoned_check_still_reaches_terminal_state() {
        let checker = shared();
        checker.lock().await.add_symptom("cough", Severity::Mild).unwrap();

        let waiter = tokio::spawn(run_check(
            checker.clone(),
            Arc::new(SlowService(Duration::from_millis(200))),
        ));
        while !checker.lock().await.is_loading() {
            tokio::task::yield_now().await;
        }
        waiter.abort();

        tokio::time::sleep(Duration::from_millis(600)).await;
        let guard = checker.lock().await;
        assert_eq!(
            guard.state(),
            &CheckerState::Success(AnalysisResult::new(RiskLevel::Low, "Not a diagnosis."))
        );
        assert!(guard.can_submit());
    }

    #[tokio::test]
    async fn analyze_guarded_maps_panic_to_message() {
        let outcome = analyze_guarded(Arc::new(PanickingService), "Mild cough".into()).await;
        assert_eq!(outcome, Err(UNEXPECTED_ERROR_MESSAGE.to_string()));

        let service = Arc::new(StaticAnalysisService::new(low_result()));
        let outcome = analyze_guarded(service, "Mild cough".into()).await;
        assert_eq!(outcome, Ok(low_result()));
    }
}
