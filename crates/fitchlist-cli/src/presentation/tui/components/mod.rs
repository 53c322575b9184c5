mod body;
mod footer;
mod header;
mod inspect;

pub(crate) use body::BodyComponent;
pub(crate) use footer::FooterComponent;
pub(crate) use header::{HEADER_HEIGHT, HeaderComponent};
pub(crate) use inspect::InspectComponent;

use ratatui::{Frame, layout::Rect};

use super::app::App;

pub(crate) trait Component {
    fn render(&self, f: &mut Frame, area: Rect, app: &App);
}
