// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod dates;
pub mod forms;
pub mod model;
pub mod sample;
pub mod state;
pub mod view;

pub use controller::*;
pub use dates::*;
pub use forms::*;
pub use model::*;
pub use sample::*;
pub use state::*;
pub use view::*;
