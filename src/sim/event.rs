use crate::dynamics::state::BodyState;
use super::runner::Telemetry;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Liftoff,
    Touchdown,
    Apex { height: f64 },
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: BodyState,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive telemetry frames and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind>;
}

/// Reports the craft leaving and returning to a ground-distance band.
pub struct GroundContactDetector {
    pub threshold: f64,
}

impl GroundContactDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl EventDetector for GroundContactDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        let before = prev.output.ground.distance;
        let now = current.output.ground.distance;
        if before <= self.threshold && now > self.threshold {
            Some(EventKind::Liftoff)
        } else if before > self.threshold && now <= self.threshold {
            Some(EventKind::Touchdown)
        } else {
            None
        }
    }
}

/// Detects the top of a jump (vertical speed turning negative) above a
/// minimum ground distance.
pub struct ApexDetector {
    pub min_height: f64,
}

impl EventDetector for ApexDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        let height = current.output.ground.distance;
        if prev.state.vel.y > 0.0 && current.state.vel.y <= 0.0 && height > self.min_height {
            Some(EventKind::Apex { height })
        } else {
            None
        }
    }
}

/// Ordered subscriber list. Subscribers run synchronously, in the order
/// they were added, for every published event.
#[derive(Default)]
pub struct EventBus<'a> {
    subscribers: Vec<Box<dyn FnMut(&SimEvent) + 'a>>,
}

impl<'a> EventBus<'a> {
    pub fn new() -> Self {
        Self { subscribers: vec![] }
    }

    pub fn subscribe(&mut self, f: impl FnMut(&SimEvent) + 'a) {
        self.subscribers.push(Box::new(f));
    }

    pub fn publish(&mut self, event: &SimEvent) {
        for s in &mut self.subscribers {
            s(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnc::ControlOutput;
    use nalgebra::Vector3;
    use std::cell::RefCell;

    fn frame(distance: f64, vy: f64) -> Telemetry {
        let mut state = BodyState::at_rest(Vector3::new(0.0, distance, 0.0));
        state.vel.y = vy;
        let mut output = ControlOutput::default();
        output.ground.hit = true;
        output.ground.distance = distance;
        Telemetry { state, output }
    }

    #[test]
    fn liftoff_then_touchdown() {
        let mut det = GroundContactDetector::new(3.0);
        assert_eq!(det.check(&frame(1.5, 0.0), &frame(3.5, 4.0)), Some(EventKind::Liftoff));
        assert_eq!(det.check(&frame(3.5, 4.0), &frame(5.0, 2.0)), None);
        assert_eq!(det.check(&frame(3.2, -4.0), &frame(2.0, -4.0)), Some(EventKind::Touchdown));
    }

    #[test]
    fn apex_detected_only_when_high() {
        let mut det = ApexDetector { min_height: 2.0 };
        assert_eq!(
            det.check(&frame(4.0, 0.5), &frame(4.01, -0.1)),
            Some(EventKind::Apex { height: 4.01 })
        );
        assert_eq!(det.check(&frame(1.5, 0.5), &frame(1.5, -0.1)), None);
    }

    #[test]
    fn subscribers_run_in_order() {
        let log = RefCell::new(Vec::new());
        let mut bus = EventBus::new();
        bus.subscribe(|e: &SimEvent| log.borrow_mut().push(format!("a:{:?}", e.kind)));
        bus.subscribe(|e: &SimEvent| log.borrow_mut().push(format!("b:{:?}", e.kind)));
        let event = SimEvent {
            time: 1.0,
            kind: EventKind::Liftoff,
            state: BodyState::at_rest(Vector3::zeros()),
        };
        bus.publish(&event);
        bus.publish(&event);
        assert_eq!(bus.len(), 2);
        assert_eq!(*log.borrow(), vec!["a:Liftoff", "b:Liftoff", "a:Liftoff", "b:Liftoff"]);
    }
}
