use crate::engine::core::app_state::SelectionText;
use crate::tools::picking::RecordSelected;
use bevy::prelude::*;

pub fn selection_text_update_system(
    mut selections: EventReader<RecordSelected>,
    mut query: Query<&mut Text, With<SelectionText>>,
) {
    let Some(last) = selections.read().last() else {
        return;
    };
    let label = format!(
        "{} {}: {} [{}]",
        last.kind.as_str(),
        last.record.id,
        last.record.name,
        last.record.status
    );
    for mut text in &mut query {
        text.0 = label.clone();
    }
}
