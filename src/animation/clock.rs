/// Scene clock advanced once per rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    value: f32,
    step: f32,
    frames: u64,
}

impl AnimationClock {
    /// Negative or non-finite steps are treated as zero so the clock never runs
    /// backwards
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() { step.max(0.0) } else { 0.0 };
        Self {
            value: 0.0,
            step,
            frames: 0,
        }
    }

    /// Advances by one step and returns the new value
    pub fn advance(&mut self) -> f32 {
        self.value += self.step;
        self.frames += 1;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Number of advances since the last reset
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(0.01)
    }
}
