// Integration tests for name classification and the run configuration

mod common;

use anyhow::Result;
use tempfile::TempDir;

use jellyfin_organizer::classifier::{EpisodeTag, PathClassifier};
use jellyfin_organizer::config::{ConfigBuilder, ModeOverride};
use jellyfin_organizer::plan::{disc_folder_name, episode_file_name, season_folder_name};
use jellyfin_organizer::script::ScriptDialect;

#[test]
fn test_season_from_directory() -> Result<()> {
    let classifier = PathClassifier::new()?;
    assert_eq!(classifier.season_number("Season 04"), Some(4));
    assert_eq!(classifier.season_number("Staffel_2"), Some(2));
    assert_eq!(classifier.season_number("Show.s03.1080p"), Some(3));
    assert_eq!(classifier.season_number("Random.Folder"), None);
    Ok(())
}

#[test]
fn test_disc_from_directory() -> Result<()> {
    let classifier = PathClassifier::new()?;
    assert_eq!(classifier.disc_number("S2D1", 2), Some(1));
    assert_eq!(classifier.disc_number("DVD-3", 1), Some(3));
    assert_eq!(classifier.disc_number("Disk.2", 5), Some(2));
    assert_eq!(classifier.disc_number("Bonus", 1), None);
    Ok(())
}

#[test]
fn test_episode_tags() -> Result<()> {
    let classifier = PathClassifier::new()?;
    assert_eq!(
        classifier.explicit_tag("Show.S02E11.720p.mkv"),
        Some(EpisodeTag {
            season: 2,
            episode: 11
        })
    );
    assert_eq!(classifier.explicit_episode("show s1e7.mp4"), Some(7));
    assert_eq!(classifier.explicit_episode("Episode 7.mkv"), None);
    Ok(())
}

#[test]
fn test_canonical_names() {
    assert_eq!(season_folder_name(12), "Season 12");
    assert_eq!(disc_folder_name(3, 2), "S3D2");
    assert_eq!(episode_file_name(1, 104, Some("mp4")), "S01E104.mp4");
    assert_eq!(episode_file_name(2, 3, None), "S02E03");
}

#[test]
fn test_config_builder() -> Result<()> {
    let dir = TempDir::new()?;
    let config = ConfigBuilder::new()
        .target(dir.path())
        .output_dir(dir.path().join("scripts"))
        .dialect(ScriptDialect::Windows)
        .mode(ModeOverride::Show)
        .write_undo(false)
        .build()?;

    assert_eq!(config.target, dir.path().canonicalize()?);
    assert_eq!(config.dialect, ScriptDialect::Windows);
    assert_eq!(config.mode, ModeOverride::Show);
    assert!(!config.write_undo);
    Ok(())
}

#[test]
fn test_config_builder_rejects_files() -> Result<()> {
    let dir = TempDir::new()?;
    let file = common::touch(dir.path(), "movie.mkv")?;

    let err = ConfigBuilder::new().target(&file).build().unwrap_err();
    assert!(err.to_string().contains("Not a directory"));
    assert!(ConfigBuilder::new().build().is_err());
    Ok(())
}
