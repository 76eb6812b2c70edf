// BedSense - Over-Temperature Alarm

/// Alarm edge produced by [`TempAlarm::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmTransition {
    Raised,
    Cleared,
}

/// On at or above the threshold, off below it. Only crossings produce a
/// transition; invalid samples are ignored.
#[derive(Debug, Clone, Copy)]
pub struct TempAlarm {
    threshold_c: f32,
    active: bool,
}

impl TempAlarm {
    pub fn new(threshold_c: f32) -> Self {
        Self {
            threshold_c,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn update(&mut self, celsius: f32) -> Option<AlarmTransition> {
        if celsius.is_nan() {
            return None;
        }
        if celsius >= self.threshold_c && !self.active {
            self.active = true;
            Some(AlarmTransition::Raised)
        } else if celsius < self.threshold_c && self.active {
            self.active = false;
            Some(AlarmTransition::Cleared)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raises_and_clears_on_crossings_only() {
        let mut alarm = TempAlarm::new(40.0);
        let seq = [36.0, 39.9, 40.0, 41.5, 40.2, 39.0, 38.0, 42.0];
        let got: Vec<_> = seq.iter().filter_map(|&t| alarm.update(t)).collect();
        assert_eq!(
            got,
            [
                AlarmTransition::Raised,
                AlarmTransition::Cleared,
                AlarmTransition::Raised
            ]
        );
        assert!(alarm.is_active());
    }

    #[test]
    fn nan_keeps_current_state() {
        let mut alarm = TempAlarm::new(40.0);
        alarm.update(45.0);
        assert_eq!(alarm.update(f32::NAN), None);
        assert!(alarm.is_active());
    }
}
