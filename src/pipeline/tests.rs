use super::*;
use crate::core::inference::ModelOutput;
use crate::core::tensor::Tensor4D;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A deterministic in-memory backend counting how often it is invoked.
#[derive(Debug)]
struct FakeBackend {
    scores: Vec<f32>,
    width: Option<usize>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeBackend {
    fn with_scores(scores: Vec<f32>) -> Self {
        Self {
            width: Some(scores.len()),
            scores,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn output_width(&self) -> Option<usize> {
        self.width
    }

    fn run(&self, input: &Tensor4D) -> ClassifyResult<ModelOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(input.shape(), &[1, 224, 224, 3]);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let row = ndarray::Array2::from_shape_vec((1, self.scores.len()), self.scores.clone())
            .expect("score shape");
        Ok(ModelOutput::Named(vec![("output_0".to_string(), row)]))
    }
}

fn classifier_with(backend: Arc<FakeBackend>) -> FractureClassifier {
    FractureClassifier::builder()
        .backend(backend)
        .build()
        .expect("builder")
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    buf
}

#[test]
fn test_end_to_end_classification_from_bytes() {
    let backend = Arc::new(FakeBackend::with_scores(vec![0.08, 0.92]));
    let classifier = classifier_with(Arc::clone(&backend));

    let prediction = classifier.classify_bytes(&jpeg_bytes(512, 512)).unwrap();
    assert_eq!(prediction.class_id, 1);
    assert_eq!(&*prediction.label, "not fractured");
    assert!((prediction.confidence - 0.92).abs() < 1e-6);
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_corrupt_bytes_fail_before_the_model_runs() {
    let backend = Arc::new(FakeBackend::with_scores(vec![0.5, 0.5]));
    let classifier = classifier_with(Arc::clone(&backend));

    let result = classifier.classify_bytes(b"definitely not an image");
    assert!(matches!(result, Err(ClassifierError::ImageDecode(_))));
    assert_eq!(backend.calls(), 0);
}

#[test]
fn test_grayscale_input_is_accepted() {
    let backend = Arc::new(FakeBackend::with_scores(vec![0.7, 0.3]));
    let classifier = classifier_with(backend);

    let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(300, 400, image::Luma([90])));
    let prediction = classifier.classify_image(&gray).unwrap();
    assert_eq!(&*prediction.label, "fractured");
}

#[test]
fn test_label_count_mismatch_blocks_build() {
    let backend = Arc::new(FakeBackend::with_scores(vec![0.1, 0.9]));
    let result = FractureClassifier::builder()
        .backend(backend)
        .labels(vec![
            "fractured".to_string(),
            "not fractured".to_string(),
            "unsure".to_string(),
        ])
        .build();
    assert!(matches!(result, Err(ClassifierError::Config { .. })));
}

#[test]
fn test_dynamic_width_defers_mismatch_to_classification() {
    let backend = Arc::new(FakeBackend {
        scores: vec![0.1, 0.2, 0.7],
        width: None,
        delay: None,
        calls: AtomicUsize::new(0),
    });
    let classifier = FractureClassifier::builder()
        .backend(backend)
        .build()
        .expect("dynamic width must not block build");

    // Two default labels against a three-wide score vector
    let result = classifier.classify_bytes(&jpeg_bytes(64, 64));
    assert!(matches!(result, Err(ClassifierError::Config { .. })));
}

#[test]
fn test_missing_model_path_without_backend_is_config_error() {
    let result = FractureClassifier::builder().build();
    assert!(matches!(result, Err(ClassifierError::Config { .. })));
}

#[test]
fn test_slow_model_hits_the_bounded_wait() {
    let backend = Arc::new(FakeBackend {
        scores: vec![0.5, 0.5],
        width: Some(2),
        delay: Some(Duration::from_millis(500)),
        calls: AtomicUsize::new(0),
    });
    let classifier = FractureClassifier::builder()
        .backend(backend)
        .timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let result = classifier.classify_bytes(&jpeg_bytes(64, 64));
    assert!(matches!(result, Err(ClassifierError::ModelTimeout { .. })));
}

#[test]
fn test_batch_classification_preserves_order() {
    let backend = Arc::new(FakeBackend::with_scores(vec![0.4, 0.6]));
    let classifier = classifier_with(Arc::clone(&backend));

    let dir = std::env::temp_dir().join("fracture_detect_pipeline_batch");
    std::fs::create_dir_all(&dir).unwrap();
    let mut paths = Vec::new();
    for i in 0..3 {
        let path = dir.join(format!("xray_{}.jpg", i));
        std::fs::write(&path, jpeg_bytes(96, 96)).unwrap();
        paths.push(path);
    }

    let predictions = classifier.classify_paths(&paths).unwrap();
    assert_eq!(predictions.len(), 3);
    assert!(predictions.iter().all(|p| &*p.label == "not fractured"));
    assert_eq!(backend.calls(), 3);
}
