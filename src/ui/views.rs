//! View rendering for the picker window.

use iced::widget::{Column, Row, button, column, container, image, row, text, text_input};
use iced::{Alignment, Element, Length};

use super::{CoverPick, Message, Thumbnail, theme};
use crate::catalog::Candidate;
use crate::grid::{self, GridCell};
use crate::session::Phase;

pub fn picker_view(app: &CoverPick) -> Element<'_, Message> {
    let content = column![header(app), results(app)].spacing(theme::spacing::SM);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(theme::spacing::SM)
        .style(|_| theme::container_style(theme::color::BASE))
        .into()
}

/// "Query:" label, the query/status field and the Go button
fn header(app: &CoverPick) -> Element<'_, Message> {
    let busy = app.session.phase() == Phase::Embedding;

    let field = text_input("Album or artist", app.session.status())
        .on_input_maybe((!busy).then_some(Message::QueryChanged))
        .on_submit(Message::Search)
        .padding(theme::spacing::SM)
        .size(theme::typography::SIZE_BODY)
        .style(theme::text_input_style);

    let go = button(text("Go").size(theme::typography::SIZE_BODY))
        .on_press_maybe((!busy).then_some(Message::Search))
        .padding([theme::spacing::SM, theme::spacing::MD])
        .style(theme::button_primary);

    container(
        row![
            text("Query:")
                .size(theme::typography::SIZE_HEADING)
                .color(theme::color::TEXT_PRIMARY),
            field,
            go,
        ]
        .spacing(theme::spacing::SM)
        .align_y(Alignment::Center),
    )
    .padding(theme::spacing::XS)
    .style(|_| theme::container_style(theme::color::SURFACE))
    .into()
}

fn results<'a>(app: &'a CoverPick) -> Element<'a, Message> {
    if app.session.phase() == Phase::Searching {
        return text("Searching...")
            .size(theme::typography::SIZE_BODY)
            .color(theme::color::TEXT_MUTED)
            .into();
    }

    let rows = app.grid_rows();
    let clickable = app.session.accepts_selection();

    Column::with_children(rows.into_iter().map(|cells| -> Element<'a, Message> {
        Row::with_children(cells.into_iter().map(|cell| match cell {
            GridCell::Candidate(index, candidate) => tile(app, index, candidate, clickable),
            GridCell::NoResults => text("No results.")
                .size(theme::typography::SIZE_HEADING)
                .color(theme::color::TEXT_SECONDARY)
                .into(),
        }))
        .spacing(grid::MARGIN as u16)
        .into()
    }))
    .spacing(grid::MARGIN as u16)
    .into()
}

/// One candidate: thumbnail with its caption underneath
fn tile<'a>(
    app: &'a CoverPick,
    index: usize,
    candidate: &'a Candidate,
    clickable: bool,
) -> Element<'a, Message> {
    let size = app.thumbnail_size as f32;

    let picture: Element<'a, Message> = match app.thumbnails.get(&candidate.thumbnail_url) {
        Some(Thumbnail::Ready(handle)) => image(handle.clone())
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into(),
        Some(Thumbnail::Failed) => placeholder("No image", theme::color::ERROR, size),
        Some(Thumbnail::Loading) | None => placeholder("Loading...", theme::color::TEXT_MUTED, size),
    };

    let caption = text(grid::display_title(&candidate.artist, &candidate.title))
        .size(theme::typography::SIZE_SMALL)
        .width(Length::Fixed(size));

    button(column![picture, caption].spacing(theme::spacing::XS))
        .on_press_maybe(clickable.then_some(Message::Select(index)))
        .padding(0)
        .style(theme::button_tile)
        .into()
}

fn placeholder<'a>(label: &'a str, color: iced::Color, size: f32) -> Element<'a, Message> {
    container(text(label).size(theme::typography::SIZE_SMALL).color(color))
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .center_x(Length::Fixed(size))
        .center_y(Length::Fixed(size))
        .style(|_| theme::container_style(theme::color::SURFACE))
        .into()
}
