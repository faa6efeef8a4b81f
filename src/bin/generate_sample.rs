//! Generates a deterministic sample sales extract as CSV.
//!
//! Usage: `cargo run --bin generate_sample [output.csv]`

use chrono::NaiveDate;
use serde::Serialize;

const PRODUCTS: [&str; 6] = [
    "Men's Street Footwear",
    "Men's Athletic Footwear",
    "Women's Street Footwear",
    "Women's Athletic Footwear",
    "Men's Apparel",
    "Women's Apparel",
];
const REGIONS: [&str; 5] = ["Northeast", "Midwest", "Southeast", "South", "West"];
const METHODS: [&str; 3] = ["In-store", "Online", "Outlet"];

#[derive(Serialize)]
struct SampleRow<'a> {
    #[serde(rename = "Product")]
    product: &'a str,
    #[serde(rename = "Region")]
    region: &'a str,
    #[serde(rename = "Sales Method")]
    sales_method: &'a str,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Invoice Date")]
    invoice_date: NaiveDate,
    #[serde(rename = "Units Sold")]
    units_sold: u64,
    #[serde(rename = "Total Sales")]
    total_sales: f64,
    #[serde(rename = "Operating Profit")]
    operating_profit: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_sales.csv".to_string());

    let mut rng = SimpleRng::new(0x5a1e5);
    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");

    let mut rows: u64 = 0;
    for year in [2020, 2021] {
        for month in 1..=12u32 {
            // Mild seasonality over the course of the year.
            let season =
                1.0 + 0.35 * ((month as f64 - 1.0) / 12.0 * std::f64::consts::TAU).sin();

            for region in REGIONS {
                for method in METHODS {
                    for product in PRODUCTS {
                        // Not every product sells through every channel every month.
                        if rng.next_f64() < 0.08 {
                            continue;
                        }
                        let day = 1 + (rng.next_u64() % 28) as u32;
                        let invoice_date =
                            NaiveDate::from_ymd_opt(year, month, day).expect("day within month");

                        let units_sold =
                            (rng.gauss(420.0, 160.0) * season).max(0.0).round() as u64;
                        let price = 35.0 + rng.next_f64() * 45.0;
                        let total_sales = round2(units_sold as f64 * price);
                        let margin = 0.28 + rng.gauss(0.0, 0.09);
                        let operating_profit = round2(total_sales * margin);

                        writer
                            .serialize(SampleRow {
                                product,
                                region,
                                sales_method: method,
                                year,
                                invoice_date,
                                units_sold,
                                total_sales,
                                operating_profit,
                            })
                            .expect("Failed to write row");
                        rows += 1;
                    }
                }
            }
        }
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {rows} sale records to {output_path}");
}
