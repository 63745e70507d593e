use crate::domain::model::Placement;

pub const VIDEO_MEDIA_TYPE: &str = "video";

pub fn has_video(placements: &[Placement]) -> bool {
    placements
        .iter()
        .any(|placement| placement.declares_media_type(VIDEO_MEDIA_TYPE))
}
