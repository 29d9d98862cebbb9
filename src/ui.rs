use bevy::prelude::*;
use bevy::ui::BackgroundColor;

use scatter_tool::scatter::plugin::ScatterPanel;
use scatter_tool::scatter::queue::{ScatterHistory, ScatterOutcome};

#[derive(Component)]
pub struct PanelOverlay;

pub fn spawn_panel_overlay(mut commands: Commands) {
    commands.spawn((
        // Top-left panel node
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(12.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::linear_rgba(0.0, 0.0, 0.0, 0.6)),
    ))
    .with_children(|parent| {
        parent.spawn((
            Text::new("Scatter Tool"),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextLayout::new_with_justify(JustifyText::Left),
            TextColor(Color::WHITE),
            PanelOverlay,
        ));
    });
}

fn outcome_line(outcome: Option<&ScatterOutcome>) -> String {
    match outcome {
        None => "no scatter yet".to_string(),
        Some(ScatterOutcome::Placed { pass, placed, candidates, .. }) => {
            format!("pass {pass}: placed {placed} / {candidates}")
        }
        Some(ScatterOutcome::Failed { pass, error, placed, .. }) => {
            format!("pass {pass} failed after {placed}: {error}")
        }
    }
}

pub fn update_panel_overlay(
    panel: Res<ScatterPanel>,
    history: Res<ScatterHistory>,
    mut query: Query<&mut Text, With<PanelOverlay>>,
) {
    if !panel.is_changed() && !history.is_changed() {
        return;
    }
    let cfg = &panel.config;
    let body = format!(
        "Scatter Tool\n\
         [Tab] shape: {}  [<-/->] subdiv: {} / {} / {}  [N] create\n\
         [Up/Down] density: {:.1}  [L] align to normal: {}\n\
         rotation y: {:.0}..{:.0}  scale x: {:.2}..{:.2}\n\
         [P] preset  [Space] scatter  [Del] clear\n\
         {}",
        panel.shape.label(),
        panel.subdivisions.axis,
        panel.subdivisions.height,
        panel.subdivisions.base,
        cfg.density,
        if cfg.align_to_normal { "on" } else { "off" },
        cfg.rotation.y.min(),
        cfg.rotation.y.max(),
        cfg.scale.x.min(),
        cfg.scale.x.max(),
        outcome_line(history.last()),
    );
    for mut text in &mut query {
        text.0 = body.clone();
    }
}
