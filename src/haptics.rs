//! Haptic feedback collaborator, injected by the platform layer.
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Haptic {
    Light,
    Medium,
    Success,
}

/// Fire-and-forget vibration driver. The platform layer provides one; the
/// desktop build runs without.
pub trait HapticDriver: Send + Sync {
    fn pulse(&self, strength: Haptic);
}

#[derive(Default)]
pub struct Haptics {
    driver: Option<Box<dyn HapticDriver>>,
}
impl Haptics {
    pub fn with_driver(driver: Box<dyn HapticDriver>) -> Self {
        Self { driver: Some(driver) }
    }
}

pub struct HapticRequest(pub Haptic);

fn trigger_haptics(haptics: Res<Haptics>, mut events: EventReader<HapticRequest>) {
    for HapticRequest(strength) in events.iter() {
        match &haptics.driver {
            Some(driver) => driver.pulse(*strength),
            None => screen_print!(sec: 5.0, "no haptic driver, skipping {strength:?}"),
        }
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Haptics>()
            .add_event::<HapticRequest>()
            .add_system(trigger_haptics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingDriver(Arc<AtomicUsize>);
    impl HapticDriver for CountingDriver {
        fn pulse(&self, _: Haptic) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn injected_driver_receives_pulses() {
        let count = Arc::new(AtomicUsize::new(0));
        let haptics = Haptics::with_driver(Box::new(CountingDriver(count.clone())));
        haptics.driver.as_ref().unwrap().pulse(Haptic::Success);
        haptics.driver.as_ref().unwrap().pulse(Haptic::Light);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_driver_is_not_an_error() {
        let haptics = Haptics::default();
        assert!(haptics.driver.is_none());
    }
}
