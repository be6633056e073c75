//! Airport actions built on the vision pipeline and the input controller.

use anyhow::{anyhow, Context, Result};

use crate::config::BotConfig;
use crate::device::{Controller, DeviceClient};
use crate::vision::extraction::{
    classify_is_ramp_agent_toggle_switch_on, extract_filter_column_icons, CandidateIcon,
};
use crate::vision::preprocess::{convert_to_buffer, BgrImage};
use crate::vision::save_image_list;

pub struct BotService<C: DeviceClient> {
    controller: Controller<C>,
    config: BotConfig,
    latest_frame: Option<BgrImage>,
}

impl<C: DeviceClient> BotService<C> {
    pub fn new(controller: Controller<C>, config: BotConfig) -> Self {
        Self {
            controller,
            config,
            latest_frame: None,
        }
    }

    pub fn controller_mut(&mut self) -> &mut Controller<C> {
        &mut self.controller
    }

    /// Captures a new frame and stores it in the canonical channel order.
    pub fn update_screenshot(&mut self) -> Result<()> {
        let raw = self.controller.get_raw_screenshot()?;
        self.latest_frame = Some(convert_to_buffer(&raw));
        Ok(())
    }

    pub fn latest_frame(&self) -> Result<&BgrImage> {
        self.latest_frame
            .as_ref()
            .ok_or_else(|| anyhow!("No screenshot captured yet"))
    }

    /// For the selected plane: adds handling crew, turns the ramp agent on
    /// if it is off, then assigns the crew.
    pub fn perform_ground_service_instruction(&mut self, no_of_crew: u32) -> Result<()> {
        let plane = self.config.selected_plane.clone();
        self.latest_frame()?;

        self.controller.tap_multiple(plane.plus_worker_button, no_of_crew)?;

        let ramp_agent_on = classify_is_ramp_agent_toggle_switch_on(
            self.latest_frame()?,
            &plane.ramp_agent_toggle_region,
            &self.config.vision.toggle,
        )
        .context("Error occurred when performing ground service instructions")?;

        if !ramp_agent_on {
            crate::log("Ramp agent is off, switching it on");
            self.controller.tap(plane.ramp_agent_toggle_button)?;
        }

        self.controller.tap(plane.action_button)
    }

    /// Starts de-icing for the selected plane.
    pub fn perform_deicing(&mut self) -> Result<()> {
        self.latest_frame()?;
        self.controller
            .tap(self.config.selected_plane.action_button)
            .context("Error occurred when performing de-icing")
    }

    /// Finds the filter column icons on the latest frame.
    pub fn check_filter_column(&self) -> Result<Vec<CandidateIcon>> {
        let icons = extract_filter_column_icons(self.latest_frame()?, &self.config.vision)
            .context("Error occurred when extracting filter column icons")?;

        if self.config.save_debug_images {
            let path = crate::paths::get_temp_dir().join("filter_icon.png");
            if let Err(e) = save_image_list(&icons.images, &path) {
                crate::log(&format!("Failed to save filter icon crops: {}", e));
            }
        }

        Ok(icons.into_candidates())
    }

    /// One bot cycle: fresh frame, then read the filter column.
    pub fn run_cycle(&mut self) -> Result<()> {
        self.update_screenshot()?;
        let icons = self.check_filter_column()?;
        for (i, icon) in icons.iter().enumerate() {
            crate::log(&format!("Filter icon {} at {}", i, icon.centre));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::controller::tests::ScriptedDevice;
    use crate::device::InputTimings;
    use crate::geometry::Point;
    use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
    use imageproc::drawing::draw_filled_circle_mut;

    // Frames as the device sends them: RGB.
    const BACKGROUND: Rgb<u8> = Rgb([240, 240, 240]);
    const TOGGLE_GREEN: Rgb<u8> = Rgb([40, 200, 60]);
    const TOGGLE_GREY: Rgb<u8> = Rgb([128, 128, 128]);

    fn frame_with_toggle(color: Rgb<u8>) -> DynamicImage {
        let config = BotConfig::default();
        let (x1, y1, x2, y2) = config
            .selected_plane
            .ramp_agent_toggle_region
            .to_tuple_x1_y1_x2_y2();
        let img: RgbImage = ImageBuffer::from_fn(1920, 1080, |x, y| {
            let (x, y) = (x as i64, y as i64);
            if x >= x1 && x < x2 && y >= y1 && y < y2 {
                color
            } else {
                BACKGROUND
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    fn service(frames: Vec<DynamicImage>) -> BotService<ScriptedDevice> {
        let device = ScriptedDevice {
            frames: frames.into(),
            connected: true,
            ..Default::default()
        };
        BotService::new(
            Controller::new(device, InputTimings::immediate()),
            BotConfig::default(),
        )
    }

    fn commands(s: &mut BotService<ScriptedDevice>) -> Vec<String> {
        s.controller_mut().client().commands.clone()
    }

    #[test]
    fn test_actions_need_a_screenshot() {
        let mut s = service(Vec::new());
        assert!(s.perform_deicing().is_err());
        assert!(s.perform_ground_service_instruction(13).is_err());
        assert!(s.check_filter_column().is_err());
        assert!(commands(&mut s).is_empty());
    }

    #[test]
    fn test_ground_service_turns_ramp_agent_on() {
        let mut s = service(vec![frame_with_toggle(TOGGLE_GREY)]);
        s.update_screenshot().unwrap();
        s.perform_ground_service_instruction(2).unwrap();

        assert_eq!(
            commands(&mut s),
            vec![
                "input tap 742 842",
                "input tap 742 842",
                "input tap 740 925",
                "input tap 640 1010",
            ]
        );
    }

    #[test]
    fn test_ground_service_leaves_ramp_agent_on() {
        let mut s = service(vec![frame_with_toggle(TOGGLE_GREEN)]);
        s.update_screenshot().unwrap();
        s.perform_ground_service_instruction(1).unwrap();

        assert_eq!(commands(&mut s), vec!["input tap 742 842", "input tap 640 1010"]);
    }

    #[test]
    fn test_ground_service_stops_on_unclear_toggle() {
        let mut s = service(vec![frame_with_toggle(Rgb([20, 40, 220]))]);
        s.update_screenshot().unwrap();
        assert!(s.perform_ground_service_instruction(1).is_err());
        // Workers were added, but nothing was assigned.
        assert_eq!(commands(&mut s), vec!["input tap 742 842"]);
    }

    #[test]
    fn test_filter_column_icons_in_frame_coordinates() {
        let mut img: RgbImage = ImageBuffer::from_pixel(1920, 1080, BACKGROUND);
        draw_filled_circle_mut(&mut img, (1865, 45), 25, Rgb([30, 70, 120]));

        let mut s = service(vec![DynamicImage::ImageRgb8(img)]);
        s.update_screenshot().unwrap();
        let icons = s.check_filter_column().unwrap();

        assert_eq!(icons.len(), 1);
        let centre: Point = icons[0].centre;
        assert!((centre.x - 1865.0).abs() <= 3.0);
        assert!((centre.y - 45.0).abs() <= 3.0);
    }

    #[test]
    fn test_run_cycle_fails_without_frames() {
        let mut s = service(Vec::new());
        assert!(s.run_cycle().is_err());
    }
}
