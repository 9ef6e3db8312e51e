// Host-side tests for procedural skylines and the texture cache.

use flight_core::*;
use std::rc::Rc;

fn small_cache() -> TextureCache {
    TextureCache::new(RasterSize::from_width(256))
}

#[test]
fn repeated_lookups_share_one_raster() {
    let mut cache = small_cache();
    let a = cache.get_texture(SceneId::London).expect("london raster");
    let b = cache.get_texture(SceneId::London).expect("london raster");
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(cache.generations(), 1);
    assert!(cache.is_cached(SceneId::London));
    assert!(!cache.is_cached(SceneId::Dubai));
}

#[test]
fn each_scene_is_generated_once() {
    let mut cache = small_cache();
    for _ in 0..3 {
        for id in SceneId::ALL {
            cache.get_texture(id);
        }
    }
    assert_eq!(cache.generations(), SceneId::ALL.len());
}

#[test]
fn headless_cache_answers_none_until_attached() {
    let mut cache = TextureCache::headless();
    assert!(!cache.has_surface());
    assert!(cache.get_texture(SceneId::Washington).is_none());
    assert_eq!(cache.generations(), 0);
    assert!(!cache.is_cached(SceneId::Washington));

    cache.attach_surface(RasterSize::from_width(256));
    assert!(cache.get_texture(SceneId::Washington).is_some());
    assert_eq!(cache.generations(), 1);
}

#[test]
fn zero_sized_surface_fails_without_caching() {
    let mut cache = TextureCache::new(RasterSize::from_width(0));
    assert!(cache.get_texture(SceneId::Dubai).is_none());
    assert!(!cache.is_cached(SceneId::Dubai));
    assert_eq!(cache.generations(), 0);
}

#[test]
fn rasters_have_requested_size_and_visible_coverage() {
    let mut cache = small_cache();
    for id in SceneId::ALL {
        let tex = cache.get_texture(id).expect("raster");
        assert_eq!(tex.scene(), id);
        assert_eq!((tex.width(), tex.height()), (256, 128));
        assert_eq!(tex.rgba().len(), 256 * 128 * 4);
        let coverage = tex.coverage();
        assert!(coverage > 0.02 && coverage < 0.95, "{:?} coverage {coverage}", id);
        // Sky above the skyline stays transparent.
        assert_eq!(tex.alpha_at(0, 0), 0);
    }
}

#[test]
fn scenes_are_distinct_and_generation_is_deterministic() {
    let mut a = small_cache();
    let mut b = small_cache();
    let london = a.get_texture(SceneId::London).expect("raster");
    let dubai = a.get_texture(SceneId::Dubai).expect("raster");
    assert_ne!(london.rgba(), dubai.rgba());
    let london_again = b.get_texture(SceneId::London).expect("raster");
    assert_eq!(london.rgba(), london_again.rgba());
}

#[test]
fn clear_drops_cached_rasters() {
    let mut cache = small_cache();
    cache.get_texture(SceneId::London);
    cache.clear();
    assert!(!cache.is_cached(SceneId::London));
    cache.get_texture(SceneId::London);
    assert_eq!(cache.generations(), 2);
}
