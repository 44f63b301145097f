use crate::data::error::PlannerError;

pub const MONTH_COUNT: usize = 12;

type Listener = Box<dyn FnMut(usize)>;

/// The month (0-based) the user is looking at.
#[derive(Default)]
pub struct ActiveMonthTracker {
    index: usize,
    listeners: Vec<Listener>,
}

impl ActiveMonthTracker {
    #[cfg(test)]
    pub fn new(index: usize) -> Result<Self, PlannerError> {
        let mut tracker = Self::default();
        tracker.set(index as i64)?;
        Ok(tracker)
    }

    pub fn get(&self) -> usize {
        self.index
    }

    /// Returns whether the index changed. Listeners only hear about changes.
    pub fn set(&mut self, index: i64) -> Result<bool, PlannerError> {
        if !(0..MONTH_COUNT as i64).contains(&index) {
            return Err(PlannerError::OutOfRange(index));
        }
        let index = index as usize;
        if index == self.index {
            return Ok(false);
        }
        self.index = index;
        for listener in &mut self.listeners {
            listener(index);
        }
        Ok(true)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(usize) + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

impl std::fmt::Debug for ActiveMonthTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveMonthTracker")
            .field("index", &self.index)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

pub fn month_name(index: usize) -> &'static str {
    match index {
        0 => "Janeiro",
        1 => "Fevereiro",
        2 => "Março",
        3 => "Abril",
        4 => "Maio",
        5 => "Junho",
        6 => "Julho",
        7 => "Agosto",
        8 => "Setembro",
        9 => "Outubro",
        10 => "Novembro",
        11 => "Dezembro",
        _ => "Unknown",
    }
}
