use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

use channel_logo_updater::{
    AppResult, Config,
    logo_matching::{AliasTable, LogoCatalog},
    models::{Outcome, SpecificFixes},
    pipeline::{DocumentState, Orchestrator, apply_specific_fixes, run_xml_pass},
    services::ArtifactUploader,
    utils::StandardContentFetcher,
};

const GUIDE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE tv SYSTEM "xmltv.dtd">
<tv generator-info-name="test">
  <channel id="BBCONE.uk">
    <display-name>BBC One</display-name>
  </channel>
  <channel id="C4.uk">
    <display-name>Channel 4</display-name>
  </channel>
  <programme start="20240101060000 +0000" stop="20240101070000 +0000" channel="BBCONE.uk">
    <title lang="en">Breakfast</title>
    <new/>
  </programme>
</tv>
"#;

const PLAYLIST: &str = r#"#EXTM3U
#EXTINF:-1 tvg-id="BBCONE.uk" tvg-name="BBC One",BBC One
http://stream.example/bbcone
#EXTINF:-1 tvg-id="ITV1.uk" tvg-name="ITV1",ITV1
http://stream.example/itv1
#EXTINF:-1 tvg-id="MYSTERY.uk",Mystery Channel
http://stream.example/mystery
"#;

/// Uploader that records what it was asked to upload
#[derive(Default)]
struct RecordingUploader {
    uploaded: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl ArtifactUploader for RecordingUploader {
    fn is_available(&self) -> bool {
        true
    }

    async fn upload(&self, path: &Path) -> AppResult<String> {
        self.uploaded.lock().unwrap().push(path.to_path_buf());
        Ok(format!("/remote/{}", path.file_name().unwrap().to_string_lossy()))
    }
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("guide.xml", GUIDE);
        fixture.write("playlist.m3u", PLAYLIST);
        fixture.write("logos.txt", "bbc-one-uk.png|https://x/bbc-one-uk.png\n");
        fixture.write("fixes.json", r#"{"ITV1.uk": "https://y/itv1.png"}"#);
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.path(name), contents).unwrap();
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    fn config(&self) -> Config {
        Config {
            input_xml: Some(self.path("guide.xml").display().to_string()),
            output_xml: Some(self.path("out/guide.xml")),
            input_m3u: Some(self.path("playlist.m3u").display().to_string()),
            output_m3u: Some(self.path("out/playlist.m3u")),
            logo_list_file: Some(self.path("logos.txt")),
            specific_fixes_file: Some(self.path("fixes.json")),
            alias_file: None,
            reports_dir: self.path("reports"),
            ..Config::default()
        }
    }
}

fn fetcher() -> StandardContentFetcher {
    StandardContentFetcher::with_timeout(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_full_run_updates_guide_then_playlist() {
    let fixture = Fixture::new();
    let config = fixture.config();
    let fetcher = fetcher();
    let uploader = RecordingUploader::default();

    let summary = Orchestrator::new(&config, &fetcher, Some(&uploader)).run().await;

    assert_eq!(summary.xml, DocumentState::Processed);
    assert_eq!(summary.m3u, DocumentState::Processed);
    assert_eq!(summary.cross_reference_entries, 1);
    assert!(!summary.all_failed());

    let guide = fixture.read("out/guide.xml");
    assert!(guide.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(guide.contains(
        "<display-name>BBC One</display-name>\n    <icon src=\"https://x/bbc-one-uk.png\"></icon>\n  </channel>"
    ));
    assert!(guide.contains("<new></new>"));
    assert!(!guide.contains("/>"));
    assert!(!fixture.path("out/guide_intermediate.xml").exists());

    let xml_matched = fixture.read("reports/logo_matching_report_xml.txt");
    assert!(xml_matched.contains("BBCONE.uk | BBC One | bbc-one-uk.png\n"));

    let playlist = fixture.read("out/playlist.m3u");
    assert!(playlist.contains(
        r#"#EXTINF:-1 tvg-id="BBCONE.uk" tvg-name="BBC One" tvg-logo="https://x/bbc-one-uk.png",BBC One"#
    ));
    assert!(playlist.contains(r#"#EXTINF:-1 tvg-id="ITV1.uk" tvg-name="ITV1" tvg-logo="https://y/itv1.png",ITV1"#));
    assert!(playlist.contains("#EXTINF:-1 tvg-id=\"MYSTERY.uk\",Mystery Channel\nhttp://stream.example/mystery"));

    let m3u_matched = fixture.read("reports/logo_matching_report_m3u.txt");
    assert!(m3u_matched.contains("BBCONE.uk | BBC One | bbc-one-uk.png | map\n"));
    assert!(m3u_matched.contains("ITV1.uk | ITV1 | itv1.png | fix\n"));
    let m3u_unmatched = fixture.read("reports/unmatched_channels_m3u.txt");
    assert!(m3u_unmatched.ends_with("MYSTERY.uk | Mystery Channel\n"));

    let uploaded = uploader.uploaded.lock().unwrap().clone();
    assert_eq!(uploaded, vec![fixture.path("out/guide.xml"), fixture.path("out/playlist.m3u")]);
    assert_eq!((summary.uploads_attempted, summary.uploads_succeeded), (2, 2));
}

#[tokio::test]
async fn test_map_wins_over_fix_for_the_same_channel() {
    let fixture = Fixture::new();
    fixture.write(
        "fixes.json",
        r#"{"ITV1.uk": "https://y/itv1.png", "C4.uk": "https://y/c4.png"}"#,
    );
    fixture.write(
        "playlist.m3u",
        "#EXTM3U\n#EXTINF:-1 tvg-id=\"C4.uk\" tvg-logo=\"https://old/c4.png\",Channel 4\nhttp://s/c4",
    );
    let config = fixture.config();
    let fetcher = fetcher();

    let summary = Orchestrator::new(&config, &fetcher, None).run().await;

    assert_eq!(summary.fixes_applied, 1);
    let pass = summary.m3u_pass.unwrap();
    assert_eq!((pass.from_map, pass.from_fix), (1, 0));
    assert!(fixture.read("out/playlist.m3u").contains(r#"tvg-logo="https://y/c4.png""#));
    assert!(fixture.read("reports/logo_matching_report_m3u.txt").contains("C4.uk | Channel 4 | c4.png | map\n"));
}

#[tokio::test]
async fn test_failed_guide_still_processes_playlist() {
    let fixture = Fixture::new();
    fixture.write("guide.xml", "<tv><channel id=\"BBCONE.uk\"><display-name>BBC One</display-name></tv>");
    let config = fixture.config();
    let fetcher = fetcher();

    let summary = Orchestrator::new(&config, &fetcher, None).run().await;

    assert!(summary.xml.is_failed());
    assert!(summary.m3u.is_processed());
    assert!(!summary.all_failed());
    assert_eq!(summary.cross_reference_entries, 0);
    assert!(!fixture.path("out/guide.xml").exists());

    let m3u_matched = fixture.read("reports/logo_matching_report_m3u.txt");
    assert!(m3u_matched.contains("BBCONE.uk | BBC One | bbc-one-uk.png | match\n"));
    assert!(m3u_matched.contains("ITV1.uk | ITV1 | itv1.png | fix\n"));
}

#[tokio::test]
async fn test_missing_inputs_fail_the_run() {
    let fixture = Fixture::new();
    let config = Config {
        input_xml: Some(fixture.path("absent.xml").display().to_string()),
        input_m3u: None,
        output_m3u: None,
        ..fixture.config()
    };
    let fetcher = fetcher();

    let summary = Orchestrator::new(&config, &fetcher, None).run().await;

    assert!(summary.xml.is_failed());
    assert_eq!(summary.m3u, DocumentState::NotRequested);
    assert!(summary.all_failed());
}

#[tokio::test]
async fn test_reports_partition_every_guide_channel() {
    let fixture = Fixture::new();
    let guide = r#"<tv>
  <channel id="BBCONE.uk"><display-name>BBC One HD</display-name></channel>
  <channel id="BBCONE.backup"><display-name>BBC One (DIRECTS)</display-name></channel>
  <channel id="C4.uk"><display-name>Channel 4</display-name></channel>
  <channel id="NONAME.uk"></channel>
  <channel id="E4.uk"><display-name>E4 &amp; More</display-name></channel>
</tv>"#;
    let catalog = Outcome::Complete(LogoCatalog::parse(
        "bbc-one-uk.png|https://x/bbc-one-uk.png\ne-4-uk.png|https://x/e-4-uk.png\n",
    ));
    let reports_dir = fixture.path("reports");

    let result = run_xml_pass(guide, &catalog, &AliasTable::builtin(), &fixture.path("out/guide.xml"), &reports_dir)
        .await
        .unwrap();

    let ids = |report: &str| -> BTreeSet<String> {
        std::fs::read_to_string(reports_dir.join(report))
            .unwrap()
            .lines()
            .skip(2)
            .map(|line| line.split(" | ").next().unwrap().to_string())
            .collect()
    };
    let matched = ids("logo_matching_report_xml.txt");
    let unmatched = ids("unmatched_channels_xml.txt");

    assert!(matched.is_disjoint(&unmatched));
    let all: BTreeSet<String> = matched.union(&unmatched).cloned().collect();
    let expected: BTreeSet<String> = ["BBCONE.uk", "BBCONE.backup", "C4.uk", "NONAME.uk", "E4.uk"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(all, expected);
    assert_eq!(result.total, 5);
    assert_eq!(result.matched, matched.len());
}

#[tokio::test]
async fn test_empty_fixes_leave_guide_byte_identical() {
    let fixture = Fixture::new();
    let catalog = Outcome::Complete(LogoCatalog::parse("bbc-one-uk.png|https://x/bbc-one-uk.png"));
    let output = fixture.path("out/guide.xml");

    let pass = run_xml_pass(GUIDE, &catalog, &AliasTable::builtin(), &output, &fixture.path("reports"))
        .await
        .unwrap();
    let fixed = apply_specific_fixes(&pass.intermediate_path, &SpecificFixes::default(), &output)
        .await
        .unwrap();

    assert_eq!(fixed, 0);
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&pass.intermediate_path).unwrap()
    );
}

#[tokio::test]
async fn test_latin1_guide_is_written_as_utf8() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.path("guide.xml"),
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<tv>\n  <channel id=\"T5.fr\">\n    <display-name>T\xe9l\xe9 5</display-name>\n  </channel>\n</tv>\n",
    )
    .unwrap();
    let config = Config {
        input_m3u: None,
        output_m3u: None,
        ..fixture.config()
    };
    let fetcher = fetcher();

    let summary = Orchestrator::new(&config, &fetcher, None).run().await;

    assert!(summary.xml.is_processed());
    let guide = fixture.read("out/guide.xml");
    assert!(guide.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(guide.contains("<display-name>Télé 5</display-name>"));
    let unmatched = fixture.read("reports/unmatched_channels_xml.txt");
    assert!(unmatched.ends_with("T5.fr | T?l? 5\n"));
}
