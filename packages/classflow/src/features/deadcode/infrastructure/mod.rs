mod detector;

pub use detector::DeadCodeDetection;
