use colorchip_season::season::PaletteTables;
use colorchip_season::{
    Candidate, ColorExtractor, DominantColorExtractor, ExtremeChromaExtractor, LabColor,
    RecommendationRanker, Season, SeasonClassifier, SeasonPalette,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

fn product_photo() -> RgbImage {
    RgbImage::from_fn(640, 480, |x, y| {
        let r = (x * 255 / 640) as u8;
        let g = (y * 255 / 480) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    })
}

fn palette() -> SeasonPalette {
    let mut tables = PaletteTables::new();
    for (i, season) in Season::ALL.into_iter().enumerate() {
        let base = i as f64 * 15.0;
        let rows = (0..40)
            .map(|j| {
                let j = f64::from(j);
                [30.0 + base + j * 0.5, base - 20.0 + j, 40.0 - base - j * 0.7]
            })
            .collect();
        tables.insert(season, rows);
    }
    SeasonPalette::from_tables(&tables, 0.3).expect("valid palette")
}

fn benchmark_extraction(c: &mut Criterion) {
    let image = product_photo();
    let normal = DominantColorExtractor::new();
    let hardcase = ExtremeChromaExtractor::new();

    c.bench_function("normal_extract_640x480", |b| {
        b.iter(|| normal.extract("bench", black_box(&image)))
    });
    c.bench_function("hardcase_extract_640x480", |b| {
        b.iter(|| hardcase.extract("bench", black_box(&image)))
    });
}

fn benchmark_classification(c: &mut Criterion) {
    let classifier = SeasonClassifier::new(palette(), 7).expect("valid k");
    let query = LabColor::new(55.0, 12.0, 18.0).damp(0.3);

    c.bench_function("classify_160_point_palette", |b| {
        b.iter(|| classifier.classify(black_box(&query)))
    });

    let candidates: Vec<Candidate> = (0..500)
        .map(|i| {
            let v = f64::from(i % 100);
            Candidate::new(format!("c{}", i), LabColor::new(v, v - 50.0, 50.0 - v))
        })
        .collect();
    let ranker = RecommendationRanker::default();
    let target = LabColor::new(50.0, 10.0, 20.0);

    c.bench_function("rank_500_candidates", |b| {
        b.iter(|| ranker.rank(black_box(&target), black_box(&candidates)))
    });
}

criterion_group!(benches, benchmark_extraction, benchmark_classification);
criterion_main!(benches);
