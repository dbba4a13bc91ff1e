use crate::models::solar::{FeaturePair, Month, Place};
use crate::services::features;

/// Month a fresh session starts on, matching the widget's initial state.
pub const INITIAL_MONTH: Month = Month::May;

/// Immutable snapshot of one widget session. Events never mutate a
/// snapshot in place; `reduce` builds the next one, which makes the whole
/// flow testable without any UI or HTTP machinery.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub place: Option<Place>,
    pub month: Month,
    pub panel_area_m2: f64,
    pub monthly_bill_usd: f64,
    /// Latest accepted prediction, kWh/m²/day. `None` until a call
    /// succeeds or after one fails; the calculator then substitutes its
    /// default constant.
    pub prediction: Option<f64>,
    /// Sequence number the next outbound request will carry.
    next_seq: u64,
    /// Sequence number of the most recently issued request. Responses
    /// carrying any other number are stale and get discarded.
    latest_seq: Option<u64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            place: None,
            month: INITIAL_MONTH,
            panel_area_m2: 0.0,
            monthly_bill_usd: 0.0,
            prediction: None,
            next_seq: 1,
            latest_seq: None,
        }
    }
}

/// One session event. The first four mirror the widget's UI events;
/// `PredictionReceived` is produced internally when an outbound prediction
/// call completes (`result: None` on network failure).
#[derive(Debug, Clone)]
pub enum Event {
    PlaceSelected(Place),
    MonthChanged(Month),
    PanelAreaChanged(String),
    MonthlyBillChanged(String),
    PredictionReceived { seq: u64, result: Option<f64> },
}

/// Outbound call descriptor produced by a transition. The sequence number
/// travels with the request and comes back attached to the response, so a
/// slow call for an old month can never overwrite a newer result:
/// last-request-wins, not last-response-wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    pub seq: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub features: FeaturePair,
}

/// Result of applying one event: the next snapshot, plus an optional
/// prediction request the caller is responsible for dispatching.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: SessionState,
    pub request: Option<PredictionRequest>,
}

impl Transition {
    fn settled(next: SessionState) -> Self {
        Transition { next, request: None }
    }
}

/// Pure reducer: no I/O, no clock, no hidden state.
pub fn reduce(state: &SessionState, event: Event) -> Transition {
    match event {
        Event::PlaceSelected(place) => {
            let mut next = state.clone();
            next.place = Some(place);
            issue_request(next)
        }
        Event::MonthChanged(month) => {
            let mut next = state.clone();
            next.month = month;
            // Re-predict only once a place exists; before that there are
            // no coordinates to predict for.
            issue_request(next)
        }
        Event::PanelAreaChanged(raw) => {
            let mut next = state.clone();
            next.panel_area_m2 = coerce_numeric(&raw);
            Transition::settled(next)
        }
        Event::MonthlyBillChanged(raw) => {
            let mut next = state.clone();
            next.monthly_bill_usd = coerce_numeric(&raw);
            Transition::settled(next)
        }
        Event::PredictionReceived { seq, result } => {
            let mut next = state.clone();
            if state.latest_seq == Some(seq) {
                next.prediction = result;
            }
            Transition::settled(next)
        }
    }
}

/// Free-text numeric coercion for the two calculator inputs: anything that
/// does not parse as a finite float counts as 0. The precondition in the
/// calculator then suppresses the savings panel.
pub fn coerce_numeric(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn issue_request(mut next: SessionState) -> Transition {
    let request = next.place.as_ref().map(|p| PredictionRequest {
        seq: next.next_seq,
        latitude: p.latitude,
        longitude: p.longitude,
        features: features::encode(next.month),
    });
    if request.is_some() {
        next.latest_seq = Some(next.next_seq);
        next.next_seq += 1;
    }
    Transition { next, request }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicago() -> Place {
        Place {
            latitude: 41.8781,
            longitude: -87.6298,
            locality: Some("Chicago".to_string()),
            name: Some("Chicago".to_string()),
            address: Some("Chicago, IL, USA".to_string()),
        }
    }

    #[test]
    fn test_fresh_session_defaults() {
        let s = SessionState::default();
        assert_eq!(s.month, Month::May);
        assert!(s.place.is_none());
        assert!(s.prediction.is_none());
        assert_eq!(s.panel_area_m2, 0.0);
        assert_eq!(s.monthly_bill_usd, 0.0);
    }

    #[test]
    fn test_place_selected_issues_request_for_active_month() {
        let t = reduce(&SessionState::default(), Event::PlaceSelected(chicago()));
        let req = t.request.expect("place selection must issue a request");
        assert_eq!(req.seq, 1);
        assert_eq!(req.latitude, 41.8781);
        assert_eq!(req.longitude, -87.6298);
        assert_eq!(req.features, features::encode(Month::May));
        assert_eq!(t.next.place, Some(chicago()));
    }

    #[test]
    fn test_month_change_without_place_issues_no_request() {
        let t = reduce(&SessionState::default(), Event::MonthChanged(Month::Dec));
        assert!(t.request.is_none());
        assert_eq!(t.next.month, Month::Dec);
    }

    #[test]
    fn test_month_change_with_place_reissues_with_new_features() {
        let s = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let t = reduce(&s, Event::MonthChanged(Month::Dec));
        let req = t.request.expect("month change with a place must re-predict");
        assert_eq!(req.seq, 2);
        assert_eq!(req.features, features::encode(Month::Dec));
    }

    #[test]
    fn test_latest_response_applies() {
        let s = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let t = reduce(
            &s,
            Event::PredictionReceived { seq: 1, result: Some(5.43) },
        );
        assert_eq!(t.next.prediction, Some(5.43));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        // Request 1 (May) is slow; request 2 (Dec) is issued and returns
        // first. The late May response must not overwrite the Dec result.
        let s1 = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let s2 = reduce(&s1, Event::MonthChanged(Month::Dec)).next;
        let s3 = reduce(
            &s2,
            Event::PredictionReceived { seq: 2, result: Some(2.8) },
        )
        .next;
        assert_eq!(s3.prediction, Some(2.8));

        let s4 = reduce(
            &s3,
            Event::PredictionReceived { seq: 1, result: Some(6.1) },
        )
        .next;
        assert_eq!(s4.prediction, Some(2.8), "stale seq-1 response must be dropped");
    }

    #[test]
    fn test_unknown_seq_is_discarded() {
        let s = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let t = reduce(
            &s,
            Event::PredictionReceived { seq: 99, result: Some(9.9) },
        );
        assert!(t.next.prediction.is_none());
    }

    #[test]
    fn test_failed_call_clears_prediction() {
        let s1 = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let s2 = reduce(
            &s1,
            Event::PredictionReceived { seq: 1, result: Some(5.0) },
        )
        .next;
        assert_eq!(s2.prediction, Some(5.0));

        // Month change issues seq 2; that call fails.
        let s3 = reduce(&s2, Event::MonthChanged(Month::Feb)).next;
        let s4 = reduce(&s3, Event::PredictionReceived { seq: 2, result: None }).next;
        assert!(s4.prediction.is_none(), "failure must clear so the default applies");
    }

    #[test]
    fn test_input_changes_issue_no_request_and_preserve_rest() {
        let s1 = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let t = reduce(&s1, Event::PanelAreaChanged("25".to_string()));
        assert!(t.request.is_none());
        assert_eq!(t.next.panel_area_m2, 25.0);
        assert_eq!(t.next.place, s1.place);
        assert_eq!(t.next.month, s1.month);

        let t2 = reduce(&t.next, Event::MonthlyBillChanged("150.5".to_string()));
        assert!(t2.request.is_none());
        assert_eq!(t2.next.monthly_bill_usd, 150.5);
        assert_eq!(t2.next.panel_area_m2, 25.0);
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric("25.5"), 25.5);
        assert_eq!(coerce_numeric(" 42 "), 42.0);
        assert_eq!(coerce_numeric("-3"), -3.0);
        assert_eq!(coerce_numeric(""), 0.0);
        assert_eq!(coerce_numeric("abc"), 0.0);
        assert_eq!(coerce_numeric("12abc"), 0.0);
        assert_eq!(coerce_numeric("NaN"), 0.0);
        assert_eq!(coerce_numeric("inf"), 0.0);
    }

    #[test]
    fn test_reduce_is_pure() {
        let s = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let e = Event::MonthChanged(Month::Sep);
        assert_eq!(reduce(&s, e.clone()), reduce(&s, e));
    }

    #[test]
    fn test_reselecting_place_keeps_inputs_and_reissues() {
        let s1 = reduce(&SessionState::default(), Event::PlaceSelected(chicago())).next;
        let s2 = reduce(&s1, Event::PanelAreaChanged("25".to_string())).next;
        let mut elsewhere = chicago();
        elsewhere.locality = Some("Evanston".to_string());
        elsewhere.latitude = 42.0451;

        let t = reduce(&s2, Event::PlaceSelected(elsewhere.clone()));
        let req = t.request.expect("re-selection must re-predict");
        assert_eq!(req.seq, 2);
        assert_eq!(req.latitude, 42.0451);
        assert_eq!(t.next.panel_area_m2, 25.0);
        assert_eq!(t.next.place, Some(elsewhere));
    }
}
