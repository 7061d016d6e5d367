use crate::consts;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::path::PathBuf;

/// Return the area of size [`consts::DISPLAY_SIZE`] at the center of the
/// buffer
pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a rectangle of the given size centered inside `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [centered] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(centered);
    centered
}

/// Return the path to the file `name` inside the program's local data
/// directory, or `None` if that directory could not be determined
pub(crate) fn data_file_path(name: &str) -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(consts::PROGRAM_NAME).join(name))
}
