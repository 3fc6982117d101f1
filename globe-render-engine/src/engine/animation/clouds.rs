use crate::engine::core::settings::GlobeSettings;
use bevy::prelude::*;

#[derive(Component)]
pub struct CloudLayer;

pub fn rotate_clouds(
    mut clouds: Query<&mut Transform, With<CloudLayer>>,
    settings: Res<GlobeSettings>,
    time: Res<Time>,
) {
    let angle = settings.cloud_rotation_speed * time.delta_secs();
    for mut transform in &mut clouds {
        transform.rotate_y(angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn clouds_turn_by_speed_times_delta() {
        let mut app = App::new();
        app.insert_resource(GlobeSettings {
            cloud_rotation_speed: 0.5,
            ..default()
        })
        .init_resource::<Time>()
        .add_systems(Update, rotate_clouds);

        let clouds = app.world_mut().spawn((CloudLayer, Transform::default())).id();
        let other = app.world_mut().spawn(Transform::default()).id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(2));
        app.update();

        let rotation = app.world().get::<Transform>(clouds).unwrap().rotation;
        assert!(rotation.angle_between(Quat::from_rotation_y(1.0)) < 1e-4);
        assert_eq!(
            app.world().get::<Transform>(other).unwrap().rotation,
            Quat::IDENTITY
        );
    }
}
