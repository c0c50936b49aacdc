//! The disease risk prediction session.
//!
//! Holds the raw form text, the lifecycle of the outstanding request, and
//! exactly one of: nothing, the latest `PredictionResult`, or the fixed
//! error message. All mutation goes through [`PredictionSession::update`].

use tracing::debug;

use healthlens_contracts::{
    error::HealthlensResult,
    ids::{RequestId, SessionId},
    prediction::{Disease, PredictionRequest, PredictionResult},
};

use crate::{
    effect::Effect,
    lifecycle::{RequestLifecycle, Settled},
};

/// The message shown when a prediction request fails for any reason.
pub const PREDICTION_ERROR: &str = "Failed to fetch prediction. Please try again.";

/// Identifies one input of the prediction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Disease,
    Age,
    Bmi,
    Glucose,
}

impl FormField {
    /// Form order, top to bottom.
    pub const ALL: [FormField; 4] = [
        FormField::Disease,
        FormField::Age,
        FormField::Bmi,
        FormField::Glucose,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Disease => "Disease Type",
            FormField::Age => "Age (years)",
            FormField::Bmi => "BMI",
            FormField::Glucose => "Fasting Glucose (mg/dL)",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Disease => "",
            FormField::Age => "e.g., 45",
            FormField::Bmi => "e.g., 26.5",
            FormField::Glucose => "e.g., 140",
        }
    }
}

/// The form exactly as typed. Nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionForm {
    pub disease: String,
    pub age: String,
    pub bmi: String,
    pub glucose: String,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self {
            disease: Disease::Diabetes.as_str().to_string(),
            age: String::new(),
            bmi: String::new(),
            glucose: String::new(),
        }
    }
}

impl PredictionForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Disease => &self.disease,
            FormField::Age => &self.age,
            FormField::Bmi => &self.bmi,
            FormField::Glucose => &self.glucose,
        }
    }

    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Disease => self.disease = value,
            FormField::Age => self.age = value,
            FormField::Bmi => self.bmi = value,
            FormField::Glucose => self.glucose = value,
        }
    }

    /// Build the wire payload, coercing each numeric field.
    pub fn to_request(&self) -> PredictionRequest {
        PredictionRequest {
            disease: Disease::from(self.disease.as_str()),
            age: coerce_number(&self.age),
            bmi: coerce_number(&self.bmi),
            glucose: coerce_number(&self.glucose),
        }
    }
}

/// Coerce raw form text to a number. Surrounding whitespace is ignored;
/// empty or unparseable text becomes NaN and is forwarded as-is.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// One message per prediction operation.
#[derive(Debug)]
pub enum PredictionMsg {
    UpdateField { field: FormField, value: String },
    Submit,
    Settled {
        id: RequestId,
        outcome: HealthlensResult<PredictionResult>,
    },
    Reset,
}

/// Client-owned state machine for the prediction form.
#[derive(Debug, Clone)]
pub struct PredictionSession {
    session_id: SessionId,
    form: PredictionForm,
    lifecycle: RequestLifecycle,
    result: Option<PredictionResult>,
    error: Option<String>,
}

impl Default for PredictionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionSession {
    pub fn new() -> Self {
        let session_id = SessionId::new();
        Self {
            session_id,
            form: PredictionForm::default(),
            lifecycle: RequestLifecycle::new("prediction", session_id),
            result: None,
            error: None,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply one message. Returns the network call to make, if any.
    pub fn update(&mut self, msg: PredictionMsg) -> Option<Effect> {
        match msg {
            PredictionMsg::UpdateField { field, value } => {
                self.form.set(field, value);
                None
            }
            PredictionMsg::Submit => self.submit(),
            PredictionMsg::Settled { id, outcome } => {
                self.settle(id, outcome);
                None
            }
            PredictionMsg::Reset => {
                self.reset();
                None
            }
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        let id = self.lifecycle.begin()?;
        let request = self.form.to_request();

        // A new submission never shows the previous outcome.
        self.result = None;
        self.error = None;

        debug!(
            session_id = %self.session_id,
            request_id = %id,
            disease = %request.disease,
            "prediction submitted"
        );
        Some(Effect::Predict { id, request })
    }

    fn settle(&mut self, id: RequestId, outcome: HealthlensResult<PredictionResult>) {
        match self.lifecycle.settle(id, outcome) {
            Some(Settled::Succeeded(result)) => {
                self.result = Some(result);
                self.error = None;
            }
            Some(Settled::Failed) => {
                self.result = None;
                self.error = Some(PREDICTION_ERROR.to_string());
            }
            None => {}
        }
    }

    fn reset(&mut self) {
        self.form = PredictionForm::default();
        self.result = None;
        self.error = None;
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use healthlens_contracts::{
        error::ServiceError,
        prediction::{Disease, ExplanationItem, FeatureValue, PredictionResult, RiskLabel},
    };

    use super::*;

    fn fill(session: &mut PredictionSession, disease: &str, age: &str, bmi: &str, glucose: &str) {
        for (field, value) in [
            (FormField::Disease, disease),
            (FormField::Age, age),
            (FormField::Bmi, bmi),
            (FormField::Glucose, glucose),
        ] {
            session.update(PredictionMsg::UpdateField {
                field,
                value: value.to_string(),
            });
        }
    }

    fn high_risk_result() -> PredictionResult {
        PredictionResult {
            disease: "diabetes".to_string(),
            risk_score: 0.72,
            risk_label: RiskLabel::High,
            explanation: Some(vec![ExplanationItem {
                feature: "glucose".to_string(),
                value: FeatureValue::Number(140.0),
                shap_value: 0.231,
            }]),
            advice: Some("Reduce sugar intake.".to_string()),
        }
    }

    fn service_down() -> ServiceError {
        ServiceError::Status {
            endpoint: "http://localhost:8000/predict".to_string(),
            status: 500,
            body: "boom".to_string(),
        }
    }

    /// Submit and return the request id of the emitted effect.
    fn submit(session: &mut PredictionSession) -> RequestId {
        match session.update(PredictionMsg::Submit) {
            Some(Effect::Predict { id, .. }) => id,
            other => panic!("expected Predict effect, got {:?}", other),
        }
    }

    // ── Form & coercion ──────────────────────────────────────────────────────

    #[test]
    fn new_session_starts_with_default_form() {
        let session = PredictionSession::new();
        assert_eq!(session.form(), &PredictionForm::default());
        assert_eq!(session.form().disease, "diabetes");
        assert!(session.form().age.is_empty());
        assert!(!session.is_pending());
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn each_session_gets_its_own_id() {
        let a = PredictionSession::new();
        let b = PredictionSession::new();
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn update_field_accepts_any_text() {
        let mut session = PredictionSession::new();
        session.update(PredictionMsg::UpdateField {
            field: FormField::Age,
            value: "not a number".to_string(),
        });
        assert_eq!(session.form().get(FormField::Age), "not a number");
    }

    #[test]
    fn coerce_number_handles_blank_and_garbage() {
        assert_eq!(coerce_number("45"), 45.0);
        assert_eq!(coerce_number(" 26.5 "), 26.5);
        assert!(coerce_number("").is_nan());
        assert!(coerce_number("   ").is_nan());
        assert!(coerce_number("abc").is_nan());
    }

    #[test]
    fn submit_builds_coerced_payload() {
        let mut session = PredictionSession::new();
        fill(&mut session, "heart", "45", "26.5", "140");

        match session.update(PredictionMsg::Submit) {
            Some(Effect::Predict { request, .. }) => {
                assert_eq!(request.disease, Disease::Heart);
                assert_eq!(request.age, 45.0);
                assert_eq!(request.bmi, 26.5);
                assert_eq!(request.glucose, 140.0);
            }
            other => panic!("expected Predict effect, got {:?}", other),
        }
        assert!(session.is_pending());
    }

    #[test]
    fn submit_with_empty_fields_still_issues_request() {
        let mut session = PredictionSession::new();

        match session.update(PredictionMsg::Submit) {
            Some(Effect::Predict { request, .. }) => {
                assert_eq!(request.disease, Disease::Diabetes);
                assert!(request.age.is_nan());
                assert!(request.bmi.is_nan());
                assert!(request.glucose.is_nan());
            }
            other => panic!("expected Predict effect, got {:?}", other),
        }
    }

    // ── Settlement ───────────────────────────────────────────────────────────

    #[test]
    fn success_sets_result_and_clears_pending() {
        let mut session = PredictionSession::new();
        fill(&mut session, "diabetes", "45", "26.5", "140");
        let id = submit(&mut session);

        session.update(PredictionMsg::Settled {
            id,
            outcome: Ok(high_risk_result()),
        });

        assert!(!session.is_pending());
        assert_eq!(session.result(), Some(&high_risk_result()));
        assert!(session.error().is_none());
    }

    #[test]
    fn failure_sets_fixed_error_and_no_result() {
        let mut session = PredictionSession::new();
        let id = submit(&mut session);

        session.update(PredictionMsg::Settled {
            id,
            outcome: Err(service_down()),
        });

        assert!(!session.is_pending());
        assert!(session.result().is_none());
        assert_eq!(session.error(), Some(PREDICTION_ERROR));
    }

    #[test]
    fn resubmit_clears_previous_result_before_settling() {
        let mut session = PredictionSession::new();
        let first = submit(&mut session);
        session.update(PredictionMsg::Settled {
            id: first,
            outcome: Ok(high_risk_result()),
        });

        let _second = submit(&mut session);

        assert!(session.is_pending());
        assert!(session.result().is_none(), "stale result must not show while pending");
        assert!(session.error().is_none());
    }

    #[test]
    fn resubmit_after_failure_clears_error() {
        let mut session = PredictionSession::new();
        let first = submit(&mut session);
        session.update(PredictionMsg::Settled {
            id: first,
            outcome: Err(service_down()),
        });

        let _second = submit(&mut session);
        assert!(session.error().is_none());
    }

    #[test]
    fn submit_while_pending_emits_no_second_request() {
        let mut session = PredictionSession::new();
        let id = submit(&mut session);

        assert!(session.update(PredictionMsg::Submit).is_none());

        // Only the original request can settle the session.
        session.update(PredictionMsg::Settled {
            id,
            outcome: Ok(high_risk_result()),
        });
        assert!(session.result().is_some());
    }

    #[test]
    fn stale_settlement_does_not_overwrite_state() {
        let mut session = PredictionSession::new();
        let first = submit(&mut session);
        session.update(PredictionMsg::Settled {
            id: first,
            outcome: Err(service_down()),
        });
        let second = submit(&mut session);

        // The first request settling again (late duplicate) is ignored.
        session.update(PredictionMsg::Settled {
            id: first,
            outcome: Ok(high_risk_result()),
        });
        assert!(session.result().is_none());
        assert!(session.is_pending());

        session.update(PredictionMsg::Settled {
            id: second,
            outcome: Ok(high_risk_result()),
        });
        assert!(session.result().is_some());
    }

    // ── Reset ────────────────────────────────────────────────────────────────

    #[test]
    fn reset_restores_defaults_and_clears_outcome() {
        let mut session = PredictionSession::new();
        fill(&mut session, "hypertension", "60", "31.2", "180");
        let id = submit(&mut session);
        session.update(PredictionMsg::Settled {
            id,
            outcome: Ok(high_risk_result()),
        });

        session.update(PredictionMsg::Reset);

        assert_eq!(session.form(), &PredictionForm::default());
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn reset_twice_equals_reset_once() {
        let mut session = PredictionSession::new();
        fill(&mut session, "heart", "50", "", "abc");
        let id = submit(&mut session);
        session.update(PredictionMsg::Settled {
            id,
            outcome: Err(service_down()),
        });

        session.update(PredictionMsg::Reset);
        let once = (session.form().clone(), session.result().cloned(), session.error().map(str::to_string));
        session.update(PredictionMsg::Reset);
        let twice = (session.form().clone(), session.result().cloned(), session.error().map(str::to_string));

        assert_eq!(once, twice);
    }

    #[test]
    fn reset_does_not_touch_pending() {
        let mut session = PredictionSession::new();
        let id = submit(&mut session);

        session.update(PredictionMsg::Reset);
        assert!(session.is_pending());

        session.update(PredictionMsg::Settled {
            id,
            outcome: Ok(high_risk_result()),
        });
        assert!(!session.is_pending());
    }
}
