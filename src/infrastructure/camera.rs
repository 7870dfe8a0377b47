//! Webカメラフレームソース実装（nokhwa）
//!
//! FrameSourcePortの実装。nokhwa経由でWebカメラを開き、
//! RGB24のフレームをドメイン型として供給します。
//! バックエンドはOSごとに選択される（Windows: MSMF, macOS: AVFoundation, Linux: V4L2）。

use crate::domain::{CameraConfig, DomainError, DomainResult, Frame, FrameSourcePort};
use image::{ImageBuffer, Rgb};
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
    Camera,
};

/// Webカメラキャプチャ
pub struct CameraFrameSource {
    camera: Camera,
    config: CameraConfig,
    /// ストリームが実際に選択した解像度（要求値と異なることがある）
    width: u32,
    height: u32,
}

impl CameraFrameSource {
    /// カメラを開いてストリームを開始する
    pub fn new(config: CameraConfig) -> DomainResult<Self> {
        let (camera, width, height) = Self::open(&config)?;
        tracing::info!(
            "Camera opened: index={}, resolution={}x{}",
            config.index,
            width,
            height
        );

        Ok(Self {
            camera,
            config,
            width,
            height,
        })
    }

    fn open(config: &CameraConfig) -> DomainResult<(Camera, u32, u32)> {
        let index = CameraIndex::Index(config.index);

        // YUYVはほとんどのWebカメラが対応する非圧縮フォーマット。
        // RGBへのデコードはnokhwa側が行う。
        let format = CameraFormat::new(
            Resolution::new(config.width, config.height),
            FrameFormat::YUYV,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let mut camera = Camera::new(index, requested)
            .map_err(|e| DomainError::Initialization(format!("Failed to open camera: {}", e)))?;

        camera
            .open_stream()
            .map_err(|e| DomainError::Initialization(format!("Failed to start stream: {}", e)))?;

        let actual = camera.resolution();
        Ok((camera, actual.width(), actual.height()))
    }
}

impl FrameSourcePort for CameraFrameSource {
    fn read_frame(&mut self) -> DomainResult<Option<Frame>> {
        // frame()は次のフレームが来るまでブロックする
        let raw = self
            .camera
            .frame()
            .map_err(|e| DomainError::Capture(format!("Failed to fetch frame: {}", e)))?;

        let rgb: ImageBuffer<Rgb<u8>, Vec<u8>> = raw
            .decode_image::<RgbFormat>()
            .map_err(|e| DomainError::Capture(format!("Failed to decode frame: {}", e)))?;

        let (width, height) = rgb.dimensions();
        Ok(Some(Frame::new(rgb.into_raw(), width, height)))
    }

    fn reinitialize(&mut self) -> DomainResult<()> {
        tracing::info!("Reinitializing camera (index={})", self.config.index);

        let _ = self.camera.stop_stream();
        let (camera, width, height) = Self::open(&self.config)?;
        self.camera = camera;
        self.width = width;
        self.height = height;

        tracing::info!("Camera reinitialized: resolution={}x{}", width, height);
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
