#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

use plotters::prelude::*;
use primebucket::{
    ChainingMap, HashFn, HashTable, OpenAddressingMap, additive_hash, positional_hash, sip_hash,
};
use rand::{Rng, distr::Alphanumeric};

// Random keys inserted into every table
const KEY_COUNT: usize = 5_000;
// Record a sample after this many puts
const SAMPLE_EVERY: usize = 50;
const INITIAL_CAPACITY: usize = 53;

const HASHES: [(&str, HashFn); 3] =
    [("additive", additive_hash), ("positional", positional_hash), ("sip", sip_hash)];

struct Sample {
    inserted: usize,
    load_factor: f64,
    capacity: usize,
    empty_buckets: usize,
}

struct Series {
    label: String,
    samples: Vec<Sample>,
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let len = rng.random_range(4..12);
            (&mut rng).sample_iter(Alphanumeric).take(len).map(char::from).collect()
        })
        .collect()
}

// Puts every key and samples the table's shape as it grows
fn trace<M: HashTable<usize>>(mut map: M, keys: &[String]) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(keys.len() / SAMPLE_EVERY);
    for (i, key) in keys.iter().enumerate() {
        map.put(key, i);
        let inserted = i + 1;
        if inserted % SAMPLE_EVERY == 0 {
            samples.push(Sample {
                inserted,
                load_factor: map.load_factor(),
                capacity: map.capacity(),
                empty_buckets: map.empty_buckets(),
            });
        }
    }
    samples
}

// The fixed workload from the put examples: 150 keys into 53 buckets
fn put_example<M: HashTable<usize>>(name: &str, mut map: M) {
    println!("{name}: empty load size capacity");
    for i in 0..150 {
        map.put(&format!("str{i}"), i * 100);
        if i % 25 == 24 {
            println!(
                "  {} {:.2} {} {}",
                map.empty_buckets(),
                map.load_factor(),
                map.len(),
                map.capacity()
            );
        }
    }
}

// Removes every other key and shows how tombstones skew the empty bucket count
fn tombstone_churn(keys: &[String]) {
    let mut map = OpenAddressingMap::new(INITIAL_CAPACITY, sip_hash);
    for (i, key) in keys.iter().enumerate() {
        map.put(key, i);
    }
    for key in keys.iter().step_by(2) {
        map.remove(key);
    }
    println!(
        "after churn: size {} capacity {} empty buckets {} tombstones {}",
        map.len(),
        map.capacity(),
        map.empty_buckets(),
        map.tombstones()
    );

    map.resize(map.capacity());
    println!(
        "after rehash: size {} capacity {} empty buckets {} tombstones {}",
        map.len(),
        map.capacity(),
        map.empty_buckets(),
        map.tombstones()
    );
}

fn draw(
    path: &str,
    caption: &str,
    y_desc: &str,
    y_max: f64,
    series: &[Series],
    value: impl Fn(&Sample) -> f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..KEY_COUNT, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Keys Inserted")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (index, line) in series.iter().enumerate() {
        let color = Palette99::pick(index);
        let style = ShapeStyle::from(&color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                line.samples.iter().map(|sample| (sample.inserted, value(sample))),
                style,
            ))?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    put_example("open addressing", OpenAddressingMap::new(INITIAL_CAPACITY, additive_hash));
    put_example("chaining", ChainingMap::new(INITIAL_CAPACITY, additive_hash));

    let keys = random_keys(KEY_COUNT);
    println!("Inserting {} random keys", keys.len());

    let mut series = Vec::new();
    for (name, hash) in HASHES {
        series.push(Series {
            label: format!("open addressing / {name}"),
            samples: trace(OpenAddressingMap::new(INITIAL_CAPACITY, hash), &keys),
        });
        series.push(Series {
            label: format!("chaining / {name}"),
            samples: trace(ChainingMap::new(INITIAL_CAPACITY, hash), &keys),
        });
    }

    for line in &series {
        if let Some(last) = line.samples.last() {
            println!(
                "  {}: load {:.2}, capacity {}, empty buckets {}",
                line.label, last.load_factor, last.capacity, last.empty_buckets
            );
        }
    }

    tombstone_churn(&keys);

    draw(
        "load_factor.png",
        "Load Factor While Inserting",
        "Load Factor",
        1.05,
        &series,
        |sample| sample.load_factor,
    )?;

    let max_empty = series
        .iter()
        .flat_map(|line| line.samples.iter())
        .map(|sample| sample.empty_buckets)
        .max()
        .unwrap_or(0);
    draw(
        "empty_buckets.png",
        "Empty Buckets While Inserting",
        "Empty Buckets",
        max_empty as f64 * 1.1,
        &series,
        |sample| sample.empty_buckets as f64,
    )?;

    println!("Generated plot images: load_factor.png, empty_buckets.png");

    Ok(())
}
