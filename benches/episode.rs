use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use thumb_rename::SeasonEpisode;

const FILENAMES: &[&str] = &[
    "Show.Name.S01E02.1080p.WEB.H264.mkv",
    "cover_s01e02.png",
    "Show S02 E10.mp4",
    "Some.Long.Show.Name.With.Many.Parts.And.No.Marker.At.All.mkv",
    "poster.jpg",
];

fn bench_from_filename(c: &mut Criterion) {
    c.bench_function("season_episode_from_filename", |b| {
        b.iter(|| {
            for name in FILENAMES {
                black_box(SeasonEpisode::from_filename(black_box(name)));
            }
        });
    });
}

fn bench_key(c: &mut Criterion) {
    let identifier = SeasonEpisode::new(12, 345);
    c.bench_function("season_episode_key", |b| b.iter(|| black_box(identifier).key()));
}

criterion_group!(benches, bench_from_filename, bench_key);
criterion_main!(benches);
