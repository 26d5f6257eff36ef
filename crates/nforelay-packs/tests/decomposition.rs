use std::path::PathBuf;

use anyhow::Result;
use nforelay_config::HashPolicy;
use nforelay_packs::{
    EpisodeKey, Identification, PackDetection, PacksError, PacksResult, ReleaseMode,
    ReleaseRequest, ReleaseSink, ReleaseSubmission, build_episode_file_list, decompose_pack,
    detect_pack, episode_key_of, is_season_pack_name, process_release, sha256_file,
};
use nforelay_test_support::fixtures::ReleaseTree;

#[derive(Default)]
struct RecordingSink {
    submissions: Vec<ReleaseSubmission>,
}

impl ReleaseSink for RecordingSink {
    fn submit(&mut self, submission: &ReleaseSubmission) -> PacksResult<()> {
        self.submissions.push(submission.clone());
        Ok(())
    }
}

fn request(tree: &ReleaseTree, name: &str, policy: HashPolicy) -> ReleaseRequest {
    ReleaseRequest {
        release_name: name.to_string(),
        root: tree.root().to_path_buf(),
        category: "TV".to_string(),
        hash_policy: policy,
    }
}

fn listed_paths(submission: &ReleaseSubmission) -> Vec<&str> {
    submission
        .file_list
        .entries
        .iter()
        .map(|entry| entry.file_path.as_str())
        .collect()
}

#[test]
fn season_markers_in_release_names() {
    assert!(is_season_pack_name("Show.Name.S01.1080p"));
    assert!(is_season_pack_name("Show.Name.S0102.German"));
    assert!(is_season_pack_name("Daily.Show.S2024.720p"));
    assert!(!is_season_pack_name("Show.Name.S01E05.1080p"));
    assert!(!is_season_pack_name("Movie.Title.2021.1080p"));
}

#[test]
fn file_count_fallback_needs_three_videos() -> Result<()> {
    let tree = ReleaseTree::new("Unmarked.Collection")?;
    tree.file("a.mkv", 1)?;
    tree.file("nested/b.mp4", 1)?;
    assert_eq!(
        detect_pack("Unmarked.Collection", tree.root())?,
        PackDetection::NotPack
    );

    tree.file("nested/deeper/c.avi", 1)?;
    assert_eq!(
        detect_pack("Unmarked.Collection", tree.root())?,
        PackDetection::ByFileCount
    );
    assert_eq!(
        detect_pack("Show.S01E05.1080p", tree.root())?,
        PackDetection::ByFileCount
    );
    Ok(())
}

#[test]
fn shared_directory_pack_keeps_case_preserved_names() -> Result<()> {
    let pack = "Show.Name.S01.1080p";
    let tree = ReleaseTree::new(pack)?;
    let first = tree.file("Show.Name.S01E01.mkv", 4)?;
    let second = tree.file("Show.Name.S01E02.mkv", 5)?;
    let nfo = tree.file("Show.Name.S01E01.nfo", 1)?;

    let decomposition = decompose_pack(tree.root(), pack)?;
    assert_eq!(decomposition.general_nfo, None);
    let units: Vec<_> = decomposition.units().collect();
    assert_eq!(units.len(), 2);

    assert_eq!(units[0].video.path, first);
    assert_eq!(units[0].key, EpisodeKey::episode("01"));
    assert_eq!(units[0].release_name, "Show.Name.S01E01");
    assert_eq!(units[0].nfo, Some(nfo));

    assert_eq!(units[1].video.path, second);
    assert_eq!(units[1].key, EpisodeKey::episode("02"));
    assert_eq!(units[1].release_name, "Show.Name.S01E02");
    assert_eq!(units[1].nfo, None);
    Ok(())
}

#[test]
fn synthesized_names_yield_the_same_key() -> Result<()> {
    let pack = "Show.Name.S01.COMPLETE.1080p";
    let tree = ReleaseTree::new(pack)?;
    tree.file("show.name.s01e04.mkv", 1)?;
    tree.file("show.name.s01e05.mkv", 1)?;

    let decomposition = decompose_pack(tree.root(), pack)?;
    let names: Vec<_> = decomposition
        .units()
        .map(|unit| unit.release_name.as_str())
        .collect();
    assert_eq!(names, ["Show.Name.S01E04.1080p", "Show.Name.S01E05.1080p"]);
    for unit in decomposition.units() {
        assert_eq!(episode_key_of(&unit.release_name).as_ref(), Some(&unit.key));
    }
    Ok(())
}

#[test]
fn lowercase_subdirectory_matching_the_pack_is_rejected() -> Result<()> {
    let pack = "Show.Name.S01.1080p";
    let tree = ReleaseTree::new(pack)?;
    tree.file("show.name.s01e03.1080p/video.mkv", 1)?;
    tree.file("Show.Name.S01E04.1080p/video.mkv", 1)?;

    let decomposition = decompose_pack(tree.root(), pack)?;
    assert_eq!(decomposition.identifications.len(), 2);
    let rejected = &decomposition.identifications[1];
    assert!(matches!(rejected, Identification::Rejected { .. }));
    assert_eq!(rejected.release_name(), "");
    assert_eq!(
        decomposition.identifications[0].release_name(),
        "Show.Name.S01E04.1080p"
    );
    Ok(())
}

#[test]
fn shared_directory_file_lists_never_cross_episodes() -> Result<()> {
    let pack = "Show.Name.S01.1080p";
    let tree = ReleaseTree::new(pack)?;
    tree.file("Show.Name.S01E01.mkv", 10)?;
    tree.file("Show.Name.S01E01.srt", 2)?;
    tree.file("Show.Name.S01E02.mkv", 10)?;
    tree.file("Show.Name.S01E02.srt", 2)?;
    tree.file("Sample/Show.Name.S01E01.sample.mkv", 1)?;
    tree.file("readme.txt", 1)?;

    let decomposition = decompose_pack(tree.root(), pack)?;
    let Some(unit) = decomposition
        .units()
        .find(|unit| unit.key == EpisodeKey::episode("02"))
    else {
        anyhow::bail!("episode 2 missing");
    };
    let listing = build_episode_file_list(unit, &decomposition.videos)?;
    let paths: Vec<_> = listing
        .entries
        .iter()
        .map(|entry| entry.file_path.as_str())
        .collect();
    assert_eq!(paths, ["Show.Name.S01E02.mkv", "Show.Name.S01E02.srt"]);
    for entry in &listing.entries {
        assert!(listing.resolve(entry).is_file());
    }
    Ok(())
}

#[test]
fn subdirectory_pack_is_processed_end_to_end() -> Result<()> {
    let pack = "Show.Name.S02.720p";
    let tree = ReleaseTree::new(pack)?;
    let e01 = tree.file("Show.Name.S02E01.720p/Show.Name.S02E01.720p.mkv", 8)?;
    tree.file("Show.Name.S02E01.720p/Subs/eng.srt", 2)?;
    tree.file("Show.Name.S02E02.720p/Show.Name.S02E02.720p.mkv", 8)?;
    let e02_nfo = tree.file("Show.Name.S02E02.720p/info.nfo", 1)?;
    tree.file("show.name.s02e03.720p/show.name.s02e03.720p.mkv", 8)?;
    tree.file("Extras/featurette.mkv", 8)?;
    let general = tree.file("Show.Name.S02.720p.nfo", 1)?;

    let mut sink = RecordingSink::default();
    let report = process_release(&request(&tree, pack, HashPolicy::Always), &mut sink)?;

    assert_eq!(report.mode, ReleaseMode::SeasonPack);
    assert_eq!(report.detection, PackDetection::ByName);
    assert_eq!(
        report.submitted,
        ["Show.Name.S02E01.720p", "Show.Name.S02E02.720p"]
    );
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.unmatched.len(), 1);
    assert!(report.failures.is_empty());

    let first = &sink.submissions[0];
    assert_eq!(first.nfo_path, Some(general));
    assert_eq!(first.content_hash, Some(sha256_file(&e01)?));
    assert_eq!(
        listed_paths(first),
        ["Show.Name.S02E01.720p.mkv", "Subs/eng.srt"]
    );
    assert_eq!(first.file_list_request().category, "TV");

    let second = &sink.submissions[1];
    assert_eq!(second.nfo_path, Some(e02_nfo));
    Ok(())
}

#[test]
fn small_unmarked_release_is_submitted_once() -> Result<()> {
    let name = "Movie.Title.2021.1080p";
    let tree = ReleaseTree::new(name)?;
    let movie = tree.file("Movie.Title.2021.1080p.mkv", 20)?;
    tree.file("Sample/sample.mkv", 2)?;
    let nfo = tree.file("Movie.Title.2021.1080p.nfo", 1)?;

    let mut sink = RecordingSink::default();
    let report = process_release(&request(&tree, name, HashPolicy::Never), &mut sink)?;

    assert_eq!(report.mode, ReleaseMode::SingleRelease);
    assert_eq!(sink.submissions.len(), 1);
    let submission = &sink.submissions[0];
    assert_eq!(submission.release_name, name);
    assert_eq!(submission.media_path, Some(movie));
    assert_eq!(submission.nfo_path, Some(nfo));
    assert_eq!(submission.content_hash, None);
    assert_eq!(submission.file_list.entries.len(), 3);
    Ok(())
}

#[test]
fn missing_root_is_structural() {
    let mut sink = RecordingSink::default();
    let request = ReleaseRequest {
        release_name: "Show.S01".to_string(),
        root: PathBuf::from("/definitely/not/here/Show.S01"),
        category: String::new(),
        hash_policy: HashPolicy::Always,
    };
    assert!(matches!(
        process_release(&request, &mut sink),
        Err(PacksError::InvalidInput { .. })
    ));
    assert!(sink.submissions.is_empty());
}

#[test]
fn single_file_download_is_submitted_with_its_own_listing() -> Result<()> {
    let name = "Movie.Title.2021.1080p";
    let downloads = ReleaseTree::new("Downloads")?;
    let movie = downloads.file("Movie.Title.2021.1080p.mkv", 11)?;
    downloads.file("Unrelated.Release.mkv", 3)?;
    downloads.file("Unrelated.Release.nfo", 1)?;
    let request = ReleaseRequest {
        release_name: name.to_string(),
        root: movie.clone(),
        category: "Movies".to_string(),
        hash_policy: HashPolicy::Always,
    };

    let mut sink = RecordingSink::default();
    let report = process_release(&request, &mut sink)?;

    assert_eq!(report.mode, ReleaseMode::SingleRelease);
    assert_eq!(report.submitted, [name]);
    let submission = &sink.submissions[0];
    assert_eq!(submission.media_path.as_ref(), Some(&movie));
    assert_eq!(submission.nfo_path, None);
    assert_eq!(submission.content_hash, Some(sha256_file(&movie)?));
    assert_eq!(listed_paths(submission), ["Movie.Title.2021.1080p.mkv"]);
    assert_eq!(submission.file_list.base_dir, downloads.root());
    assert_eq!(submission.file_list.entries[0].file_size_bytes, 11);
    Ok(())
}
