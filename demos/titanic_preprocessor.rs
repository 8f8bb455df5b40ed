//! Titanic preprocessing plan
//!
//! Builds preprocessing plans for a small Titanic passenger sample:
//! - `age` and `fare` are imputed with the median and standardized
//! - `alone` is a 0/1 flag, imputed only
//! - `sex`, `embarked` and `pclass` are one-hot or ordinal encoded
//! - `name` is in no feature list and is dropped
//!
//! Run with: cargo run --example titanic_preprocessor [path/to/titanic.csv]
//! Set `RUST_LOG=tabular_prep=debug` to see the plan being built and fitted.

use std::error::Error;
use tabular_prep::frame::Frame;
use tabular_prep::preprocessing::{FittedTransformer, Remainder, Transformer};
use tabular_prep::{make_preprocessor, CatTransform, FeatureColumns, PreprocessorConfig};

const PASSENGERS: &str = "\
name,pclass,sex,age,fare,alone,embarked
Braund,3,male,22,7.25,0,S
Cumings,1,female,38,71.2833,0,C
Heikkinen,3,female,26,7.925,1,S
Futrelle,1,female,35,53.1,0,S
Allen,3,male,35,8.05,1,S
Moran,3,male,,8.4583,1,Q
McCarthy,1,male,54,51.8625,1,S
Palsson,3,male,2,21.075,0,S
Johnson,3,female,27,11.1333,0,S
Nasser,2,female,14,30.0708,0,C
Sandstrom,3,female,4,16.7,,S
Bonnell,1,female,58,26.55,1,S
Saundercock,3,male,20,8.05,1,S
Andersson,3,male,39,31.275,0,S
Vestrom,3,female,14,7.8542,1,S
Hewlett,2,female,55,16,1,S
Rice,3,male,2,29.125,0,Q
Williams,2,male,,13,1,S
Vander Planke,3,female,31,18,0,S
Masselmani,3,female,,7.225,1,C
";

fn load_frame() -> Result<Frame, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(Frame::from_csv_path(path)?),
        None => Ok(Frame::from_csv_reader(PASSENGERS.as_bytes())?),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabular_prep=info".into()),
        )
        .init();

    let passengers = load_frame()?;
    println!(
        "Loaded {} passengers with columns {:?}",
        passengers.n_rows(),
        passengers.column_names()
    );

    let features = FeatureColumns::new()
        .with_numeric(["age", "fare"])
        .with_binary(["alone"])
        .with_categorical(["sex", "embarked", "pclass"]);

    for cat_transform in [CatTransform::OneHot, CatTransform::Ordinal] {
        let config = PreprocessorConfig::default()
            .with_cat_transform(cat_transform)
            .with_remainder(Remainder::Drop);

        let (plan, n_features) = make_preprocessor(&passengers, &features, &config)?;
        let fitted = plan.fit(&passengers)?;
        let encoded = fitted.transform(&passengers)?;

        println!("\n=== cat_transform = {} ===", cat_transform);
        println!("Expected features: {}", n_features);
        println!(
            "Output shape: {:?} ({})",
            encoded.shape(),
            if encoded.is_sparse() { "sparse" } else { "dense" }
        );
        println!("Feature names: {:?}", fitted.feature_names_out());

        let dense = encoded.into_dense();
        for (i, row) in dense.rows().into_iter().take(3).enumerate() {
            let values: Vec<String> = row.iter().map(|v| format!("{:.3}", v)).collect();
            println!("  row {}: [{}]", i, values.join(", "));
        }
    }

    Ok(())
}
