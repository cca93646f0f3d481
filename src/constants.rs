//! Shared crate-wide constants.

use crate::geometry::Point;

/// Length of one update tick in milliseconds.
pub const TIMESTEP_MS: u32 = 8;

/// Logical screen size the windows are laid out against.
pub const VIEWPORT: Point = Point::new(800, 600);

/// Channel count assumed when the world-select window never reported one
/// (for example after a direct reconnect).
pub const DEFAULT_CHANNEL_COUNT: u8 = 20;

/// Offset from the cursor at which tooltips are anchored.
pub const TOOLTIP_OFFSET: Point = Point::new(0, 22);

/// Number of pointer ticks after an icon drop during which presses do not
/// start a new drag.
///
/// The tick counter is advanced by `update()`, so a drop and the press that
/// follows it within the same frame can never re-arm a drag.
pub const REGRAB_COOLDOWN_TICKS: u8 = 1;

/// Upper bound on request batches drained after a single dispatch. A window
/// that keeps queueing requests in response to its own requests stops here.
pub const MAX_REQUEST_ROUNDS: usize = 32;

/// Caret blink half-period of text fields, in ticks.
pub const CARET_BLINK_TICKS: u32 = 256 / TIMESTEP_MS;
