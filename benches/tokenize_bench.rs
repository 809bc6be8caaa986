use std::hint::black_box;
use std::time::Instant;

use runic::{cells, normalize};
use runic_render::{Document, VectorGlyphs};

const WARMUP_ITERS: usize = 50;
const MEASURE_ITERS: usize = 500;

const SAMPLES: &[(&str, &str)] = &[
    ("short", "tɛst"),
    ("sentence", "ðə kwɪk bɹaʊn fɑks dʒʌmpt oʊvɝ ðə leɪzi dɔɡ!"),
    (
        "noisy",
        "mixed 123 input ðæt ɪz oʊnli pɑɹtli aɪ-pi-eɪ, with ASCII noise ?!",
    ),
];

#[derive(Clone, Debug)]
struct CaseResult {
    case: String,
    iterations: usize,
    min_ns: u128,
    median_ns: u128,
    mean_ns: u128,
    max_ns: u128,
}

fn percentile(sorted: &[u128], percentile: f64) -> u128 {
    let idx = ((sorted.len().saturating_sub(1) as f64) * percentile).round() as usize;
    sorted[idx]
}

fn run_case<F>(case: &str, mut op: F) -> CaseResult
where
    F: FnMut() -> usize,
{
    for _ in 0..WARMUP_ITERS {
        black_box(op());
    }

    let mut samples = Vec::with_capacity(MEASURE_ITERS);
    for _ in 0..MEASURE_ITERS {
        let start = Instant::now();
        black_box(op());
        samples.push(start.elapsed().as_nanos());
    }
    samples.sort_unstable();

    let sum: u128 = samples.iter().copied().sum();
    CaseResult {
        case: case.to_string(),
        iterations: MEASURE_ITERS,
        min_ns: samples[0],
        median_ns: percentile(&samples, 0.5),
        mean_ns: sum / samples.len() as u128,
        max_ns: samples[samples.len() - 1],
    }
}

fn report(result: &CaseResult) {
    println!(
        "{:<28} iters={} min={}ns median={}ns mean={}ns max={}ns",
        result.case,
        result.iterations,
        result.min_ns,
        result.median_ns,
        result.mean_ns,
        result.max_ns
    );
}

fn main() {
    // Warm the shared glyph table so layout cases measure layout, not
    // first-use construction.
    let table = VectorGlyphs::shared();

    for (name, text) in SAMPLES {
        report(&run_case(&format!("normalize/{}", name), || {
            normalize(text).len()
        }));
        report(&run_case(&format!("cells/{}", name), || cells(text).count()));
        report(&run_case(&format!("layout/{}", name), || {
            let mut doc = Document::new();
            doc.append(text);
            doc.draw_commands(0.0, 0.0, table)
                .map(|commands| commands.len())
                .unwrap_or(0)
        }));
    }
}
