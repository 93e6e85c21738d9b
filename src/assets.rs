use std::collections::HashMap;

use egui::{TextureId, Vec2};

pub const FIGURE_ASSET: &str = "nyan.png";

/// A texture the host has already uploaded. The host keeps the underlying
/// handle alive for as long as the entry stays in the cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTexture {
    pub id: TextureId,
    pub size: Vec2,
}

impl ResolvedTexture {
    pub fn aspect_ratio(&self) -> f32 {
        if self.size.y <= 0.0 {
            return 1.0;
        }
        self.size.x / self.size.y
    }
}

/// Resolved textures keyed by asset path.
///
/// Written by the host's asset-resolution step at the start of a frame and
/// only read by renderers afterwards.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<String, ResolvedTexture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: impl Into<String>, texture: ResolvedTexture) {
        self.entries.insert(asset.into(), texture);
    }

    pub fn get(&self, asset: &str) -> Option<&ResolvedTexture> {
        self.entries.get(asset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn later_insert_replaces_entry() {
        let mut cache = TextureCache::new();
        cache.insert(FIGURE_ASSET, ResolvedTexture { id: TextureId::User(1), size: vec2(10.0, 5.0) });
        cache.insert(FIGURE_ASSET, ResolvedTexture { id: TextureId::User(2), size: vec2(40.0, 20.0) });
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(FIGURE_ASSET).map(|t| t.id), Some(TextureId::User(2)));
        assert!((cache.get(FIGURE_ASSET).map(|t| t.aspect_ratio()).unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_height_has_unit_aspect() {
        let texture = ResolvedTexture { id: TextureId::User(0), size: vec2(10.0, 0.0) };
        assert_eq!(texture.aspect_ratio(), 1.0);
    }
}
