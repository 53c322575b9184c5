use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::app::App;
use super::components::{
    BodyComponent, Component, FooterComponent, HEADER_HEIGHT, HeaderComponent, InspectComponent,
};

const FOOTER_HEIGHT: u16 = 2;

pub(crate) fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(f.area());

    HeaderComponent.render(f, chunks[0], app);
    BodyComponent.render(f, chunks[1], app);
    FooterComponent.render(f, chunks[2], app);

    if app.inspecting {
        InspectComponent.render(f, chunks[1], app);
    }
}
