use divan::{Bencher, black_box};
use leamanyi::{Analyzer, Corpus, Lexicon, Matcher};

fn main() {
    divan::main();
}

const DATA: &str = "data";
const SENTENCES: &str = "sample_inputs/sentences.txt";

/// Benchmark loading the word lists and compiling the templates
#[divan::bench]
fn build_analyzer(bencher: Bencher) {
    bencher.bench_local(|| black_box(Analyzer::from_data_dir(black_box(DATA)).unwrap()));
}

/// Benchmark compiling the templates against an already loaded lexicon
#[divan::bench]
fn compile_templates(bencher: Bencher) {
    let lexicon = Lexicon::from_data_dir(DATA).unwrap();
    bencher.bench_local(|| black_box(Matcher::new(black_box(&lexicon)).unwrap()));
}

/// Benchmark scanning the sample sentences
#[divan::bench]
fn find_sample_sentences(bencher: Bencher) {
    let analyzer = Analyzer::from_data_dir(DATA).unwrap();
    let sentences: Vec<String> = Corpus::from_file(SENTENCES)
        .into_iter()
        .map(|s| s.text)
        .collect();

    bencher.bench_local(|| {
        for sentence in &sentences {
            black_box(analyzer.find(black_box(sentence)));
        }
    });
}
