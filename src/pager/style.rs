//! Display-only style overrides applied to every working view before layout.

use crate::model::Style;

/// Apply the reader's fixed style overrides.
///
/// A soloed instrument never shows its own name, whatever `show_instrument_names` says.
pub fn configure_view_style(
    style: &mut Style,
    show_instrument_names: bool,
    concert_pitch: bool,
    solo_instrument: bool,
) {
    style.show_footer = false;
    style.show_header = false;
    style.show_page_number = false;
    style.hide_instrument_name_if_one_instrument = true;
    style.concert_pitch = concert_pitch;
    style.show_frames = false;
    style.show_unprintable = false;
    style.show_invisible = false;
    style.show_instrument_names = show_instrument_names && !solo_instrument;
}
