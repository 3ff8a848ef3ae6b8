//! Profile image on a record page: view, edit and persist.

mod display;
mod save_profile_image;

pub use display::{
    DisplaySettings, EditOutcome, ProfileImageDisplay, ProfileImageError, ProfileImageView,
};
pub use save_profile_image::{SaveProfileImage, SaveProfileImageError};
