//! Volume panel: one bar per day, coloured by direction.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, LegendPosition},
};

use super::{color, date_axis, panel_block};
use crate::view::{BarDirection, ViewModel, compact_volume, volume_ceiling};

pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel<'_>) {
    let rows = view.rows();
    let mut up = Vec::new();
    let mut down = Vec::new();
    for ((i, row), direction) in rows.iter().enumerate().zip(view.bar_directions()) {
        let Some(volume) = row.volume else { continue };
        match direction {
            BarDirection::Up => up.push((i as f64, volume)),
            BarDirection::Down => down.push((i as f64, volume)),
        }
    }

    let max = volume_ceiling(rows);

    let datasets = vec![
        Dataset::default()
            .name("Up")
            .marker(Marker::Bar)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(color(BarDirection::Up.color())))
            .data(&up),
        Dataset::default()
            .name("Down")
            .marker(Marker::Bar)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(color(BarDirection::Down.color())))
            .data(&down),
    ];

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, max])
        .labels([Span::raw("0"), Span::raw(compact_volume(max))]);

    let chart = Chart::new(datasets)
        .block(panel_block("Volume"))
        .x_axis(date_axis(rows))
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopLeft));
    frame.render_widget(chart, area);
}
