/// Default asset paths for the globe surface and cloud textures.
pub const DAY_TEXTURE_PATH: &str = "textures/earth_day.jpg";
pub const NIGHT_TEXTURE_PATH: &str = "textures/earth_night.jpg";
pub const CLOUD_TEXTURE_PATH: &str = "textures/earth_clouds.png";

/// Longitudinal and latitudinal segment counts for the globe mesh.
pub const GLOBE_SECTORS: u32 = 96;
pub const GLOBE_STACKS: u32 = 64;
