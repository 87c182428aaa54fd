//! The info popup as a state machine.
//!
//! [`PopupState::transition`] is a pure reducer; [`PopupController`] owns the
//! request token counter so only the newest click's lookup can land.

use crate::{
    core::geo::Point, data::attributes::AttributeRecord, input::events::PopupEvent, Result,
};

/// Stamped on every click, strictly increasing within a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

/// What the caller needs to start the lookup for a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    pub token: RequestToken,
    pub coordinate: Point,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PopupState {
    #[default]
    Hidden,
    Loading {
        token: RequestToken,
        anchor: Point,
    },
    Shown {
        token: RequestToken,
        anchor: Point,
        record: AttributeRecord,
    },
    ShownEmpty {
        token: RequestToken,
        anchor: Point,
    },
}

impl PopupState {
    pub fn transition(self, event: PopupEvent) -> PopupState {
        match event {
            PopupEvent::Click { token, coordinate } => PopupState::Loading {
                token,
                anchor: coordinate,
            },
            PopupEvent::Close => PopupState::Hidden,
            PopupEvent::Resolved { token, record } => match self {
                PopupState::Loading {
                    token: pending,
                    anchor,
                } if pending == token => match record {
                    Some(record) => PopupState::Shown {
                        token,
                        anchor,
                        record,
                    },
                    None => PopupState::ShownEmpty { token, anchor },
                },
                // stale or unsolicited result
                other => other,
            },
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, PopupState::Hidden)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PopupState::Loading { .. })
    }

    /// Coordinate the overlay is pinned to
    pub fn anchor(&self) -> Option<Point> {
        match self {
            PopupState::Hidden => None,
            PopupState::Loading { anchor, .. }
            | PopupState::Shown { anchor, .. }
            | PopupState::ShownEmpty { anchor, .. } => Some(*anchor),
        }
    }

    pub fn record(&self) -> Option<&AttributeRecord> {
        match self {
            PopupState::Shown { record, .. } => Some(record),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct PopupController {
    state: PopupState,
    last_token: u64,
}

impl PopupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    /// Token of the most recent click, if any click happened
    pub fn latest_token(&self) -> Option<RequestToken> {
        (self.last_token > 0).then_some(RequestToken(self.last_token))
    }

    /// Shows the popup in its loading state at `coordinate` and returns the
    /// ticket for the lookup. Supersedes any lookup still in flight.
    pub fn click(&mut self, coordinate: Point) -> FetchTicket {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.apply(PopupEvent::Click { token, coordinate });
        FetchTicket { token, coordinate }
    }

    /// Applies a finished lookup. Returns `false` when the result was stale
    /// and discarded. Failures degrade to the empty state.
    pub fn resolve(&mut self, token: RequestToken, result: Result<Option<AttributeRecord>>) -> bool {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("attribute lookup {:?} failed: {}", token, e);
                None
            }
        };

        let applies = matches!(self.state, PopupState::Loading { token: pending, .. } if pending == token);
        if !applies {
            log::debug!("discarding stale lookup result {:?}", token);
            return false;
        }
        self.apply(PopupEvent::Resolved { token, record });
        true
    }

    pub fn close(&mut self) {
        self.apply(PopupEvent::Close);
    }

    fn apply(&mut self, event: PopupEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;
    use serde_json::json;

    fn record(id: &str) -> AttributeRecord {
        serde_json::from_value(json!({ "seragid": id })).unwrap()
    }

    #[test]
    fn test_initial_state_is_hidden() {
        let controller = PopupController::new();
        assert_eq!(controller.state(), &PopupState::Hidden);
        assert_eq!(controller.latest_token(), None);
    }

    #[test]
    fn test_click_then_record() {
        let mut controller = PopupController::new();
        let ticket = controller.click(Point::new(10.0, 20.0));

        assert!(controller.state().is_loading());
        assert_eq!(controller.state().anchor(), Some(Point::new(10.0, 20.0)));

        assert!(controller.resolve(ticket.token, Ok(Some(record("A1")))));
        assert_eq!(controller.state().record(), Some(&record("A1")));
    }

    #[test]
    fn test_no_record_and_failure_show_empty() {
        let mut controller = PopupController::new();
        let ticket = controller.click(Point::new(1.0, 1.0));
        controller.resolve(ticket.token, Ok(None));
        assert!(matches!(controller.state(), PopupState::ShownEmpty { .. }));

        let ticket = controller.click(Point::new(2.0, 2.0));
        controller.resolve(ticket.token, Err(MapError::Http { status: 500, url: "x".into() }));
        assert!(matches!(
            controller.state(),
            PopupState::ShownEmpty { anchor, .. } if *anchor == Point::new(2.0, 2.0)
        ));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut controller = PopupController::new();
        let first = controller.click(Point::new(1.0, 1.0));
        let second = controller.click(Point::new(2.0, 2.0));
        assert!(second.token > first.token);

        assert!(controller.resolve(second.token, Ok(Some(record("B")))));
        assert!(!controller.resolve(first.token, Ok(Some(record("A")))));

        assert_eq!(controller.state().record(), Some(&record("B")));
        assert_eq!(controller.state().anchor(), Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_result_after_close_is_discarded() {
        let mut controller = PopupController::new();
        let ticket = controller.click(Point::new(1.0, 1.0));
        controller.close();

        assert!(!controller.resolve(ticket.token, Ok(Some(record("A")))));
        assert_eq!(controller.state(), &PopupState::Hidden);
    }

    #[test]
    fn test_new_click_from_shown_goes_back_to_loading() {
        let state = PopupState::Shown {
            token: RequestToken(1),
            anchor: Point::new(0.0, 0.0),
            record: record("A"),
        };
        let next = state.transition(PopupEvent::Click {
            token: RequestToken(2),
            coordinate: Point::new(5.0, 5.0),
        });
        assert_eq!(
            next,
            PopupState::Loading {
                token: RequestToken(2),
                anchor: Point::new(5.0, 5.0)
            }
        );
    }

    #[test]
    fn test_resolved_does_not_reopen_hidden() {
        let next = PopupState::Hidden.transition(PopupEvent::Resolved {
            token: RequestToken(1),
            record: None,
        });
        assert_eq!(next, PopupState::Hidden);
    }
}
