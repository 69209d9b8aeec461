//! Chaotic modulation generators.

/*
Nonlinear Generators
====================

Each generator is a small dynamical system advanced by explicit forward-Euler
integration:

    state' = state + t * f(state)

or, for the discrete maps, by plain iteration of a recurrence:

    state' = f(state)

Continuous systems (3-state unless noted):

  Rössler      classic single-scroll spiral
  Hopf         2-state limit cycle around the origin
  Helmholtz    asymmetric jerk system
  Sprott       Sprott case A
  Linz         Sprott-Linz jerk
  Tsucs        three-scroll unified chaotic system
  Van der Pol  2-state relaxation oscillator

Discrete maps (2-state):

  Ikeda, Duffing, Gingerbreadman

Continuous systems update their coordinates in order, each equation seeing
the coordinates already advanced above it. Discrete maps compute the whole
new state from the old one.

Nothing here is bounded. Large step sizes or aggressive parameters send the
state to infinity and then to NaN within a few hundred steps. `Guarded` is
the read boundary: it checks the state after every step and puts the system
back at its starting point when a coordinate stops being finite.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Common interface of all generators.
pub trait Attractor: Send {
    /// Advance the system by one step.
    fn step(&mut self);

    /// Current coordinates. Two-state systems report `z = 0`.
    fn state(&self) -> [f32; 3];

    /// Return the coordinates to their initial values. Parameters are kept.
    fn reset(&mut self);

    /// Change the integration step. Discrete maps ignore it.
    fn set_step_size(&mut self, _t: f32) {}

    /// The coordinate used as a modulation signal.
    fn output(&self) -> f32 {
        self.state()[1]
    }
}

impl Attractor for Box<dyn Attractor> {
    fn step(&mut self) {
        (**self).step()
    }

    fn state(&self) -> [f32; 3] {
        (**self).state()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn set_step_size(&mut self, t: f32) {
        (**self).set_step_size(t)
    }

    fn output(&self) -> f32 {
        (**self).output()
    }
}

#[derive(Debug, Clone)]
pub struct Roessler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub t: f32,
}

impl Default for Roessler {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
            a: 0.2,
            b: 0.2,
            c: 5.7,
            t: 0.01,
        }
    }
}

impl Attractor for Roessler {
    fn step(&mut self) {
        self.x += (-self.y - self.z) * self.t;
        self.y += (self.x + self.a * self.y) * self.t;
        self.z += (self.b + self.z * (self.x - self.c)) * self.t;
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn reset(&mut self) {
        (self.x, self.y, self.z) = (1.0, 1.0, 1.0);
    }

    fn set_step_size(&mut self, t: f32) {
        self.t = t;
    }
}

#[derive(Debug, Clone)]
pub struct Hopf {
    pub x: f32,
    pub y: f32,
    pub p: f32,
    pub t: f32,
}

impl Default for Hopf {
    fn default() -> Self {
        Self {
            x: 0.01,
            y: 0.01,
            p: 0.11,
            t: 0.01,
        }
    }
}

impl Attractor for Hopf {
    fn step(&mut self) {
        let r = self.x * self.x + self.y * self.y;
        self.x += self.t * (-self.y + self.x * (self.p - r));
        // y sees the updated x
        let r = self.x * self.x + self.y * self.y;
        self.y += self.t * (self.x + self.y * (self.p - r));
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, 0.0]
    }

    fn reset(&mut self) {
        (self.x, self.y) = (0.01, 0.01);
    }

    fn set_step_size(&mut self, t: f32) {
        self.t = t;
    }
}

#[derive(Debug, Clone)]
pub struct Helmholtz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub gamma: f32,
    pub delta: f32,
    pub t: f32,
}

impl Default for Helmholtz {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.1,
            z: 0.1,
            gamma: 5.11,
            delta: 0.55,
            t: 0.01,
        }
    }
}

impl Attractor for Helmholtz {
    fn step(&mut self) {
        self.x += self.t * self.y;
        self.y += self.t * self.gamma * self.z;
        self.z += self.t * (-self.z - self.delta * self.y - self.x - self.x * self.x);
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn reset(&mut self) {
        (self.x, self.y, self.z) = (0.1, 0.1, 0.1);
    }

    fn set_step_size(&mut self, t: f32) {
        self.t = t;
    }
}

#[derive(Debug, Clone)]
pub struct Sprott {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub t: f32,
}

impl Default for Sprott {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.1,
            z: 0.1,
            t: 0.1,
        }
    }
}

impl Attractor for Sprott {
    fn step(&mut self) {
        self.x += self.t * self.y;
        self.y += self.t * (self.y * self.z - self.x);
        self.z += self.t * (1.0 - self.y * self.y);
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn reset(&mut self) {
        (self.x, self.y, self.z) = (0.1, 0.1, 0.1);
    }

    fn set_step_size(&mut self, t: f32) {
        self.t = t;
    }
}

#[derive(Debug, Clone)]
pub struct Linz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub a: f32,
    pub t: f32,
}

impl Default for Linz {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.1,
            z: 0.1,
            a: 0.5,
            t: 0.1,
        }
    }
}

impl Attractor for Linz {
    fn step(&mut self) {
        self.x += self.t * (self.y + self.z);
        self.y += self.t * (self.y * self.a - self.x);
        self.z += self.t * (self.x * self.x - self.z);
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn reset(&mut self) {
        (self.x, self.y, self.z) = (0.1, 0.1, 0.1);
    }

    fn set_step_size(&mut self, t: f32) {
        self.t = t;
    }
}

/// Three-scroll unified chaotic system.
#[derive(Debug, Clone)]
pub struct Tsucs {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub t: f32,
}

impl Default for Tsucs {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
            a: 40.0,
            b: 0.5,
            c: 20.0,
            d: 0.833,
            e: 0.65,
            t: 0.001,
        }
    }
}

impl Attractor for Tsucs {
    fn step(&mut self) {
        self.x += self.t * (self.a * (self.y - self.x) + self.b * self.x * self.z);
        self.y += self.t * (self.c * self.y - self.x * self.z);
        self.z += self.t * (self.d * self.z + self.x * self.y - self.e * self.x * self.x);
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn reset(&mut self) {
        (self.x, self.y, self.z) = (1.0, 1.0, 1.0);
    }

    fn set_step_size(&mut self, t: f32) {
        self.t = t;
    }
}

#[derive(Debug, Clone)]
pub struct VanDerPol {
    pub x: f32,
    pub y: f32,
    pub f: f32,
    pub m: f32,
    pub t: f32,
}

impl Default for VanDerPol {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.1,
            f: 1.2,
            m: 1.0,
            t: 0.1,
        }
    }
}

impl Attractor for VanDerPol {
    fn step(&mut self) {
        self.x += self.t * self.y;
        self.y += self.t * (self.m * (self.f - self.x * self.x) * self.y - self.x);
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, 0.0]
    }

    fn reset(&mut self) {
        (self.x, self.y) = (0.1, 0.1);
    }

    fn set_step_size(&mut self, t: f32) {
        self.t = t;
    }
}

#[derive(Debug, Clone)]
pub struct Ikeda {
    pub x: f32,
    pub y: f32,
    pub u: f32,
}

impl Default for Ikeda {
    fn default() -> Self {
        Self {
            x: 0.8,
            y: 0.7,
            u: 0.918,
        }
    }
}

impl Attractor for Ikeda {
    fn step(&mut self) {
        let angle = 0.4 - 6.0 / (1.0 + self.x * self.x + self.y * self.y);
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (self.x, self.y);
        self.x = 1.0 + self.u * (x * cos - y * sin);
        self.y = self.u * (x * sin + y * cos);
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, 0.0]
    }

    fn reset(&mut self) {
        (self.x, self.y) = (0.8, 0.7);
    }
}

#[derive(Debug, Clone)]
pub struct Duffing {
    pub x: f32,
    pub y: f32,
    pub a: f32,
    pub b: f32,
}

impl Default for Duffing {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.1,
            a: 2.75,
            b: 0.2,
        }
    }
}

impl Attractor for Duffing {
    fn step(&mut self) {
        let (x, y) = (self.x, self.y);
        self.x = y;
        self.y = -self.b * x + self.a * y - y * y * y;
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, 0.0]
    }

    fn reset(&mut self) {
        (self.x, self.y) = (0.1, 0.1);
    }
}

#[derive(Debug, Clone)]
pub struct Gingerbreadman {
    pub x: f32,
    pub y: f32,
}

impl Default for Gingerbreadman {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl Attractor for Gingerbreadman {
    fn step(&mut self) {
        let x = self.x;
        self.x = 1.0 - self.y + x.abs();
        self.y = x;
    }

    fn state(&self) -> [f32; 3] {
        [self.x, self.y, 0.0]
    }

    fn reset(&mut self) {
        (self.x, self.y) = (1.0, 1.0);
    }
}

/// Registry of the available generators.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Roessler,
    Hopf,
    Helmholtz,
    Sprott,
    Linz,
    Tsucs,
    VanDerPol,
    Ikeda,
    Duffing,
    Gingerbreadman,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 10] = [
        GeneratorKind::Roessler,
        GeneratorKind::Hopf,
        GeneratorKind::Helmholtz,
        GeneratorKind::Sprott,
        GeneratorKind::Linz,
        GeneratorKind::Tsucs,
        GeneratorKind::VanDerPol,
        GeneratorKind::Ikeda,
        GeneratorKind::Duffing,
        GeneratorKind::Gingerbreadman,
    ];

    /// Build the generator at its initial state.
    pub fn build(self) -> Box<dyn Attractor> {
        match self {
            GeneratorKind::Roessler => Box::new(Roessler::default()),
            GeneratorKind::Hopf => Box::new(Hopf::default()),
            GeneratorKind::Helmholtz => Box::new(Helmholtz::default()),
            GeneratorKind::Sprott => Box::new(Sprott::default()),
            GeneratorKind::Linz => Box::new(Linz::default()),
            GeneratorKind::Tsucs => Box::new(Tsucs::default()),
            GeneratorKind::VanDerPol => Box::new(VanDerPol::default()),
            GeneratorKind::Ikeda => Box::new(Ikeda::default()),
            GeneratorKind::Duffing => Box::new(Duffing::default()),
            GeneratorKind::Gingerbreadman => Box::new(Gingerbreadman::default()),
        }
    }

    pub fn is_discrete(self) -> bool {
        matches!(
            self,
            GeneratorKind::Ikeda | GeneratorKind::Duffing | GeneratorKind::Gingerbreadman
        )
    }
}

/// Finite-value guard around a generator.
pub struct Guarded<A: Attractor> {
    inner: A,
    resets: u32,
}

impl<A: Attractor> Guarded<A> {
    pub fn new(inner: A) -> Self {
        Self { inner, resets: 0 }
    }

    /// Step once and return the modulation output, which is always finite.
    pub fn process(&mut self) -> f32 {
        self.inner.step();
        if self.inner.state().iter().all(|v| v.is_finite()) {
            return self.inner.output();
        }

        self.inner.reset();
        self.resets = self.resets.wrapping_add(1);
        log::debug!("generator diverged, reset #{}", self.resets);

        let out = self.inner.output();
        if out.is_finite() {
            out
        } else {
            0.0
        }
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }
}

impl Guarded<Box<dyn Attractor>> {
    pub fn from_kind(kind: GeneratorKind) -> Self {
        Self::new(kind.build())
    }
}
