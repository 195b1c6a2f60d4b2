//! Viewer contract
//!
//! Every tick the loop presents a `ViewFrame` (one sprite per body plus the
//! camera focus) and then asks whether the user wants to quit. A quit request is
//! honoured at the start of the next tick.

use crate::simulation::states::{Body, NVec2, PLANET};

/// Visual category of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Planet,
    Asteroid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub pos: NVec2,
    pub radius: f64,
    pub tag: BodyTag,
}

/// Borrowed snapshot of the bodies for one tick.
#[derive(Debug, Clone, Copy)]
pub struct ViewFrame<'a> {
    pub t: f64,
    pub bodies: &'a [Body],
    pub focus: NVec2,
}

impl<'a> ViewFrame<'a> {
    /// Sprites in stable storage order, planet first.
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + 'a {
        self.bodies.iter().enumerate().map(|(i, b)| Sprite {
            pos: b.pos,
            radius: b.radius,
            tag: if i == PLANET { BodyTag::Planet } else { BodyTag::Asteroid },
        })
    }
}

pub trait Viewer {
    fn present(&mut self, frame: &ViewFrame<'_>);

    fn quit_requested(&self) -> bool;
}
