//! Cross-module scenarios driving zones and renderers together

mod sphere_scenario;
