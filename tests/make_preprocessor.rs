use approx::assert_relative_eq;
use ndarray::Array2;
use tabular_prep::frame::{Column, Frame};
use tabular_prep::preprocessing::{FittedTransformer, ImputeStrategy, Remainder, Transformer};
use tabular_prep::{
    build_preprocessor, make_preprocessor, CatTransform, FeatureColumns, PreprocessingError,
    PreprocessorConfig,
};

fn frame() -> Frame {
    Frame::from_columns(vec![
        ("x1", Column::numeric(vec![1.0, f64::NAN, 3.0, 10.0])),
        ("x2", Column::numeric(vec![2.0, 4.0, 6.0, 8.0])),
        ("b", Column::numeric(vec![1.0, 0.0, f64::NAN, 1.0])),
        ("c", Column::text(vec![Some("A"), Some("B"), Some("C"), Some("A")])),
        ("z", Column::numeric(vec![100.0, 200.0, 300.0, 400.0])),
    ])
    .unwrap()
}

fn features() -> FeatureColumns {
    FeatureColumns::new()
        .with_numeric(["x1", "x2"])
        .with_binary(["b"])
        .with_categorical(["c"])
}

fn fit_transform(config: &PreprocessorConfig) -> (Vec<String>, Array2<f64>) {
    let sample = frame();
    let plan = build_preprocessor(&sample, &features(), config).unwrap();
    let fitted = plan.fit(&sample).unwrap();
    let output = fitted.transform(&sample).unwrap().into_dense();
    (fitted.feature_names_out(), output)
}

fn column_of(names: &[String], name: &str) -> usize {
    names.iter().position(|n| n == name).unwrap()
}

#[test]
fn routing_covers_every_listed_column() {
    let config = PreprocessorConfig::default()
        .with_remainder(Remainder::Drop)
        .with_sparse(false);
    let (names, output) = fit_transform(&config);

    assert_eq!(
        names,
        vec!["num__x1", "num__x2", "bin__b", "cat__c_A", "cat__c_B", "cat__c_C"]
    );
    assert_eq!(output.dim(), (4, 6));
}

#[test]
fn one_hot_sets_single_position_in_sample_order() {
    let config = PreprocessorConfig::default().with_remainder(Remainder::Drop);
    let (names, output) = fit_transform(&config);

    let start = column_of(&names, "cat__c_A");
    let block = output.slice(ndarray::s![1, start..start + 3]).to_vec();
    assert_eq!(block, vec![0.0, 1.0, 0.0]);
    assert!(output
        .rows()
        .into_iter()
        .all(|row| row.slice(ndarray::s![start..start + 3]).sum() == 1.0));
}

#[test]
fn ordinal_yields_sample_order_index() {
    let config = PreprocessorConfig::default()
        .with_cat_transform(CatTransform::Ordinal)
        .with_remainder(Remainder::Drop);
    let (names, output) = fit_transform(&config);

    let col = column_of(&names, "cat__c");
    assert_eq!(output.column(col).to_vec(), vec![0.0, 1.0, 2.0, 0.0]);
}

#[test]
fn median_imputation_happens_before_scaling() {
    let config = PreprocessorConfig::default().with_remainder(Remainder::Drop);
    let (names, output) = fit_transform(&config);
    let x1 = output.column(column_of(&names, "num__x1"));

    // Imputed column is [1, 3, 3, 10]: mean 4.25, population std sqrt(11.6875)
    let std = 11.6875f64.sqrt();
    assert_relative_eq!(x1[1], (3.0 - 4.25) / std, epsilon = 1e-10);
    assert_relative_eq!(x1[0], (1.0 - 4.25) / std, epsilon = 1e-10);

    for name in ["num__x1", "num__x2"] {
        let column = output.column(column_of(&names, name));
        let n = column.len() as f64;
        let mean = column.sum() / n;
        let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-10);
        assert_relative_eq!(var, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn most_frequent_imputation_leaves_binary_unscaled() {
    let config = PreprocessorConfig::default()
        .with_strategy(ImputeStrategy::MostFrequent)
        .with_remainder(Remainder::Drop);
    let (names, output) = fit_transform(&config);

    let b = output.column(column_of(&names, "bin__b"));
    assert_eq!(b.to_vec(), vec![1.0, 0.0, 1.0, 1.0]);
}

#[test]
fn remainder_drop_versus_passthrough() {
    let (dropped_names, dropped) =
        fit_transform(&PreprocessorConfig::default().with_remainder(Remainder::Drop));
    assert!(!dropped_names.iter().any(|n| n.contains('z')));
    assert_eq!(dropped.ncols(), 6);

    let (kept_names, kept) =
        fit_transform(&PreprocessorConfig::default().with_remainder(Remainder::Passthrough));
    assert_eq!(kept.ncols(), 7);
    assert_eq!(kept_names.last().map(String::as_str), Some("remainder__z"));
    assert_eq!(kept.column(6).to_vec(), vec![100.0, 200.0, 300.0, 400.0]);
}

#[test]
fn feature_count_for_four_category_column() {
    let sample = frame()
        .with_column(
            "d",
            Column::text(vec![Some("p"), Some("q"), Some("r"), Some("s")]),
        )
        .unwrap();
    let features = FeatureColumns::new()
        .with_numeric(["x1", "x2"])
        .with_binary(["b"])
        .with_categorical(["d"]);

    // `c` is left unlisted, so drop it.
    let one_hot_config = PreprocessorConfig::default().with_remainder(Remainder::Drop);
    let (_, one_hot) = make_preprocessor(&sample, &features, &one_hot_config).unwrap();
    assert_eq!(one_hot, 7);

    let ordinal_config = one_hot_config.with_cat_transform(CatTransform::Ordinal);
    let (_, ordinal) = make_preprocessor(&sample, &features, &ordinal_config).unwrap();
    assert_eq!(ordinal, 4);
}

#[test]
fn plan_rejects_categories_outside_sample() {
    let sample = frame();
    let plan = build_preprocessor(
        &sample,
        &features(),
        &PreprocessorConfig::default().with_remainder(Remainder::Drop),
    )
    .unwrap();
    let fitted = plan.fit(&sample).unwrap();

    let unseen = Frame::from_columns(vec![
        ("x1", Column::numeric(vec![1.0])),
        ("x2", Column::numeric(vec![1.0])),
        ("b", Column::numeric(vec![0.0])),
        ("c", Column::text(vec![Some("E")])),
    ])
    .unwrap();
    assert!(matches!(
        fitted.transform(&unseen),
        Err(PreprocessingError::UnknownCategory { column, value }) if column == "c" && value == "E"
    ));
}

#[test]
fn plan_loaded_from_csv() {
    let csv = "\
age,fare,alone,embarked,name
22,7.25,0,S,Braund
38,71.28,0,C,Cumings
26,,1,S,Heikkinen
35,53.1,,Q,Futrelle
";
    let sample = Frame::from_csv_reader(csv.as_bytes()).unwrap();
    let features = FeatureColumns::new()
        .with_numeric(["age", "fare"])
        .with_binary(["alone"])
        .with_categorical(["embarked"]);

    let config = PreprocessorConfig::default().with_remainder(Remainder::Drop);
    let (plan, n_features) = make_preprocessor(&sample, &features, &config).unwrap();
    assert_eq!(n_features, 6);

    let output = plan.fit_transform(&sample).unwrap();
    assert_eq!(output.shape(), (4, n_features));
    assert!(output.to_dense().iter().all(|v| v.is_finite()));

    // Text leftovers cannot be passed through; the build reports it.
    let passthrough = PreprocessorConfig::default();
    assert!(matches!(
        build_preprocessor(&sample, &features, &passthrough),
        Err(PreprocessingError::NotNumeric(name)) if name == "name"
    ));
}

#[test]
fn plan_rejects_incomplete_categorical_sample() {
    let sample = frame()
        .with_column("port", Column::text(vec![Some("S"), None, Some("C"), Some("S")]))
        .unwrap();
    let features = FeatureColumns::new()
        .with_numeric(["x1"])
        .with_categorical(["port"]);

    assert!(matches!(
        make_preprocessor(&sample, &features, &PreprocessorConfig::default()),
        Err(PreprocessingError::MissingValues(name)) if name == "port"
    ));
}
