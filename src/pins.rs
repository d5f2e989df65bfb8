//! GPIO pin assignments for the sensing node board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Mode indicator LEDs (active HIGH)
// ---------------------------------------------------------------------------

/// Lit in Idle.
pub const LED_RED_GPIO: i32 = 23;
/// Lit in Performance.
pub const LED_GREEN_GPIO: i32 = 21;
/// Lit in Configuration.
pub const LED_YELLOW_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Link indicator LEDs
// ---------------------------------------------------------------------------

/// Lit while the broker session is up.
pub const CONNECTED_LED_GPIO: i32 = 17;
/// Lit while the node is still connecting.
pub const CONNECTING_LED_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Push-buttons (active LOW, internal pull-up)
// ---------------------------------------------------------------------------

pub const MODE_BUTTON_GPIO: i32 = 26;
pub const OFF_BUTTON_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line.
pub const DHT11_GPIO: i32 = 14;
/// LDR comparator output.
pub const LDR_GPIO: i32 = 19;
