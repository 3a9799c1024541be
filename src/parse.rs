use flame;
use std::collections::BTreeMap;
use std::fs;
use std::io;

use log::debug;
use regex::Regex;

/// Mean GFLOPs/s per algorithm, keyed by label, each series ascending in n.
pub type SeriesMap = BTreeMap<String, Vec<(u64, f64)>>;

// A record line starts with the benchmark name and carries a FLOPs counter
// somewhere after it:
// BM_DM/native/n:512    812345 ns    812301 ns    1 FLOPs=0.661G/s
pub fn parse(input_file: &str) -> io::Result<SeriesMap> {
    flame::start("parse");
    // Interrupted benchmark runs can leave stray bytes in the log, so decode lossily.
    let input = String::from_utf8_lossy(&fs::read(input_file)?).into_owned();
    let series = scan(&input);
    flame::end("parse");
    Ok(series)
}

fn scan(input: &str) -> SeriesMap {
    let record = Regex::new(r"^(\S+).*?\bFLOPs=([\deE+\-.]+)G/s\b").unwrap();
    let size = Regex::new(r"/n:(\d+)").unwrap();

    let mut samples: BTreeMap<String, BTreeMap<u64, Vec<f64>>> = BTreeMap::new();
    for line in input.lines() {
        let Some(caps) = record.captures(line.trim()) else {
            continue;
        };
        // The capture class is wider than the float grammar, so a leftover
        // like "1e+-2" still lands here and is skipped like any other
        // non-record line.
        let Ok(gflops) = caps[2].parse::<f64>() else {
            debug!("skipping record with unparseable throughput: {}", line.trim());
            continue;
        };
        let Some(name) = sample_name(caps.get(1).unwrap().as_str()) else {
            continue;
        };
        let Some(n) = problem_size(&size, name) else {
            debug!("skipping record without /n: token: {}", name);
            continue;
        };
        samples
            .entry(algorithm_id(name))
            .or_default()
            .entry(n)
            .or_default()
            .push(gflops);
    }

    // Collapse repeated samples into their mean. The BTreeMaps keep
    // algorithms alphabetical and sizes ascending.
    samples
        .into_iter()
        .map(|(alg, by_n)| {
            let points = by_n
                .into_iter()
                .map(|(n, values)| (n, values.iter().sum::<f64>() / values.len() as f64))
                .collect();
            (alg, points)
        })
        .collect()
}

// _stddev/_cv/_median rows restate samples that are already in the log and
// would be double-counted. A _mean row stands in for its repeats once the
// suffix is stripped.
fn sample_name(raw: &str) -> Option<&str> {
    if raw.ends_with("_stddev") || raw.ends_with("_cv") || raw.ends_with("_median") {
        return None;
    }
    Some(raw.strip_suffix("_mean").unwrap_or(raw))
}

fn problem_size(size: &Regex, name: &str) -> Option<u64> {
    size.captures(name)?[1].parse().ok()
}

// BM_DM benchmarks carry the multiply variant in their second segment;
// all Eigen baselines collapse onto the single "eigen" series.
fn algorithm_id(name: &str) -> String {
    let segments: Vec<&str> = name.split('/').collect();
    if segments[0] == "BM_DM" && segments.len() > 1 {
        return segments[1].to_string();
    }
    if segments[0].starts_with("BM_Eigen") {
        return "eigen".to_string();
    }
    segments[0].to_string()
}

#[test]
fn should_drop_lines_without_throughput() {
    let log = "\
-------------------------------------------------------------
Benchmark                   Time             CPU   Iterations
-------------------------------------------------------------
BM_DM/native/n:64      100 ns       100 ns       10
";
    assert!(scan(log).is_empty());
}

#[test]
fn should_drop_derived_statistic_rows() {
    let log = "\
BM_DM/native/n:64_stddev   1 ns 1 ns 1 FLOPs=0.5G/s
BM_DM/native/n:64_cv       1 ns 1 ns 1 FLOPs=0.5G/s
BM_DM/native/n:64_median   1 ns 1 ns 1 FLOPs=0.5G/s
";
    assert!(scan(log).is_empty());
}

#[test]
fn should_merge_mean_rows_with_plain_rows() {
    let log = "\
BM_DM/native/n:64        1 ns 1 ns 1 FLOPs=10.0G/s
BM_DM/native/n:64_mean   1 ns 1 ns 1 FLOPs=20.0G/s
";
    let series = scan(log);
    assert_eq!(series["native"], vec![(64, 15.0)]);
}

#[test]
fn should_average_repeated_samples() {
    let log = "\
BM_DM/native/n:64   1 ns 1 ns 1 FLOPs=10.0G/s
BM_DM/native/n:64   1 ns 1 ns 1 FLOPs=20.0G/s
";
    let series = scan(log);
    assert_eq!(series["native"], vec![(64, 15.0)]);
}

#[test]
fn should_derive_algorithm_ids() {
    assert_eq!(algorithm_id("BM_DM/foo/n:64"), "foo");
    assert_eq!(algorithm_id("BM_EigenGemm/n:64"), "eigen");
    assert_eq!(algorithm_id("BM_Other/n:64"), "BM_Other");
}

#[test]
fn should_drop_records_without_problem_size() {
    assert!(scan("BM_DM/native/k:64   1 ns 1 ns 1 FLOPs=1.0G/s\n").is_empty());
}

#[test]
fn should_accept_scientific_notation() {
    let series = scan("BM_DM/native/n:32   1 ns 1 ns 1 FLOPs=1.5e-2G/s\n");
    assert_eq!(series["native"], vec![(32, 0.015)]);
}

#[test]
fn should_sort_sizes_and_separate_algorithms() {
    let log = "\
BM_DM/native/n:512      1 ns 1 ns 1 FLOPs=4.0G/s
BM_DM/native/n:128      1 ns 1 ns 1 FLOPs=1.0G/s
BM_DM/native/n:256      1 ns 1 ns 1 FLOPs=2.0G/s
BM_EigenGemm/n:256      1 ns 1 ns 1 FLOPs=5.0G/s
BM_EigenGemm/n:128      1 ns 1 ns 1 FLOPs=3.0G/s
";
    let series = scan(log);
    let algorithms: Vec<&str> = series.keys().map(String::as_str).collect();
    assert_eq!(algorithms, ["eigen", "native"]);
    assert_eq!(series["native"], vec![(128, 1.0), (256, 2.0), (512, 4.0)]);
    assert_eq!(series["eigen"], vec![(128, 3.0), (256, 5.0)]);
}

#[test]
fn should_parse_a_log_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "BM_DM/native/n:64   5 ns 5 ns 1 FLOPs=2.0G/s").unwrap();
    let series = parse(file.path().to_str().unwrap()).unwrap();
    assert_eq!(series["native"], vec![(64, 2.0)]);
}

#[test]
fn should_fail_on_missing_input_file() {
    assert!(parse("does-not-exist.log").is_err());
}
