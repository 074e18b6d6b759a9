//! Statistics of the evaluator and the machinery to log them.
//!
//! Statistics are only written once [`configure_statistic_logging`] has been called; every
//! statistic is written on its own line as `{prefix} {name}={value}`.
mod moving_averages;
mod statistic_logger;
mod statistic_logging;

use std::fmt::Display;
use std::fmt::Write;

pub use moving_averages::CumulativeMovingAverage;
pub use moving_averages::MovingAverage;
pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;

/// A value which can be logged as a statistic.
///
/// See [`create_statistics_struct!`] for creating a struct of statistics which implements it.
pub trait Statistic {
    /// Logs the [`Statistic`] using the provided [`StatisticLogger`].
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, mut statistic_logger: StatisticLogger) {
        // One write per value, so that it is logged as a single statistic.
        let _ = statistic_logger.write_str(&self.to_string());
    }
}

/// Creates a struct whose fields are statistics; logging the struct logs each field, with the
/// field name attached to the prefix of the logger.
///
/// # Example
/// ```rust
/// # use pumpkin_local_search::create_statistics_struct;
/// # use pumpkin_local_search::statistics::CumulativeMovingAverage;
/// create_statistics_struct!(Statistics {
///     num_moves: u64,
///     average_move_size: CumulativeMovingAverage<u64>,
/// });
///
/// let statistics = Statistics::default();
///
/// assert_eq!(statistics.num_moves, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ty),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub struct $name {
            $($(#[$variable_documentation])* pub $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $($crate::statistics::Statistic::log(
                    &self.$field,
                    statistic_logger.attach_to_prefix(stringify!($field)),
                ));+
            }
        }
    };
}
