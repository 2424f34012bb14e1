//! Collaborator interfaces the HUD consumes from its host viewer.

use std::time::Duration;

use foundation::bounds::Size;
use foundation::math::{Spherical, Vec2, Vec3};

use crate::marker::TooltipSide;

/// Camera state and coordinate conversion of the panorama viewer.
///
/// Angles are radians unless the name says otherwise. Screen positions are
/// pixels from the viewport's top-left corner (`x` = left, `y` = top).
pub trait Viewer {
    fn project_to_screen(&self, direction: Vec3) -> Vec2;
    fn vector_to_spherical(&self, direction: Vec3) -> Spherical;
    fn spherical_to_vector(&self, position: Spherical) -> Vec3;
    fn view_direction(&self) -> Vec3;
    fn viewport_size(&self) -> Size;
    fn horizontal_fov(&self) -> f64;
    fn vertical_fov(&self) -> f64;
    fn longitude(&self) -> f64;
    fn latitude(&self) -> f64;
    /// Camera roll from orientation tracking; 0 when tracking is disabled.
    fn roll_degrees(&self) -> f64;
    fn animate_to(&mut self, target: Spherical, duration: Duration);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRequest {
    pub content: String,
    pub side: TooltipSide,
    pub top: f64,
    pub left: f64,
    /// Box the tooltip should avoid covering, starting at (`top`, `left`).
    pub size_hint: Size,
}

pub trait TooltipSurface {
    fn open(&mut self, request: TooltipRequest);
    fn close(&mut self);
}

pub trait PanelSurface {
    fn open(&mut self, content: &str);
    fn close(&mut self);
    fn is_open(&self) -> bool;
}
