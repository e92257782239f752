//! Tests for unique clip names.

use std::collections::HashSet;

use proptest::prelude::*;

use clipwave::naming::{sanitize, unique_name, unique_name_at, STEM_MAX_CHARS};

#[test]
fn same_user_same_second_never_collides() {
    let names: HashSet<String> = (0..5_000)
        .map(|_| unique_name_at("audio", STEM_MAX_CHARS, "user-1", "take.mp3", 1_700_000_000))
        .collect();
    assert_eq!(names.len(), 5_000);
}

#[test]
fn threads_allocating_concurrently_never_collide() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                (0..500)
                    .map(|_| unique_name("audio", "user-1", "take.mp3"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut names = HashSet::new();
    for handle in handles {
        for name in handle.join().unwrap() {
            assert!(names.insert(name), "duplicate name allocated");
        }
    }
    assert_eq!(names.len(), 4_000);
}

#[test]
fn prefix_is_configurable() {
    let name = unique_name_at("clip", STEM_MAX_CHARS, "u", "x.wav", 5);
    assert!(name.starts_with("clip_u_5_"));
}

#[test]
fn stem_cap_is_configurable() {
    let name = unique_name_at("audio", 4, "u", "Sunday Jam.wav", 5);
    assert!(name.ends_with("_Sund"), "{name}");

    let name = unique_name_at("audio", 64, "u", "an unusually long take name for a clip.wav", 5);
    assert!(name.ends_with("_an_unusually_long_take_name_for_a_clip"), "{name}");
}

proptest! {
    #[test]
    fn names_are_filesystem_safe(
        user in ".{0,40}",
        filename in ".{0,80}",
    ) {
        let name = unique_name("audio", &user, &filename);
        prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        prop_assert!(name.starts_with("audio_"));
    }

    #[test]
    fn sanitized_stem_respects_cap(raw in ".{0,200}") {
        let cleaned = sanitize(&raw, STEM_MAX_CHARS);
        prop_assert!(cleaned.chars().count() <= STEM_MAX_CHARS);
        prop_assert!(cleaned.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }
}
