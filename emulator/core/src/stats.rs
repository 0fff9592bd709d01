use std::fmt;
use std::time::Instant;

/// Running high/average/low of a repeated operation, in nanoseconds
#[derive(Clone, Debug)]
pub struct AverageTimer {
    pub high: u32,
    pub average: f32,
    pub low: u32,
    pub events: u32,
    start: Option<Instant>,
}

impl Default for AverageTimer {
    fn default() -> AverageTimer {
        AverageTimer {
            high: 0,
            average: 0.0,
            low: u32::MAX,
            events: 0,
            start: None,
        }
    }
}

impl AverageTimer {
    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    pub fn end(&mut self) {
        let Some(start) = self.start.take() else {
            return;
        };
        let time = u32::try_from(start.elapsed().as_nanos()).unwrap_or(u32::MAX);

        self.events += 1;
        if time > self.high {
            self.high = time;
        }
        if time < self.low {
            self.low = time;
        }
        self.average = if self.events == 1 {
            time as f32
        } else {
            (self.average + time as f32) / 2.0
        };
    }
}

impl fmt::Display for AverageTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.events == 0 {
            return write!(f, "no events");
        }
        write!(f, "H: {:8} A: {:4} L: {:8} over {} events", self.high, self.average as u32, self.low, self.events)
    }
}


#[derive(Clone, Debug, Default)]
pub struct RenderStats {
    /// Frames copied out of the core and committed for presentation
    pub frames: u64,
    /// Steps that returned a non-zero status
    pub step_faults: u64,
    pub step_time: AverageTimer,
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames: {}", self.frames)?;
        writeln!(f, "Faults: {}", self.step_faults)?;
        writeln!(f, "Step:   {}", self.step_time)?;
        Ok(())
    }
}
