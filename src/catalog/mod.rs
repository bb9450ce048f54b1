//! Catalog data model.
//!
//! Every provider response is reshaped into one of these types before it
//! reaches a client: [`Image`] for stock photos, [`Asset`] for design assets,
//! [`Movie`] for TMDB listings.

pub mod aggregate;
pub mod types;

pub use aggregate::{merge_assets, MergedAssets};
pub use types::{
    Asset, AssetPage, AssetSource, AssetType, Image, ImagePage, ImageSource, Movie, MoviePage,
    RawId,
};
