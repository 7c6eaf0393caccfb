//! Per-date agendas and the "what should I do today" resolver.

pub mod agenda;

pub use agenda::{AgendaBuilder, CalendarError, CalendarItem, TodayWorkout};
