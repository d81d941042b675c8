//! Backend options and the slot context shared between stages.

/// Flavor of GLSL to target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GlslStandard {
    #[default]
    Desktop,
    Es,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlslOptions {
    pub standard: GlslStandard,
    pub major_version: u32,
    pub minor_version: u32,
}

impl Default for GlslOptions {
    fn default() -> Self {
        GlslOptions {
            standard: GlslStandard::Desktop,
            major_version: 3,
            minor_version: 3,
        }
    }
}

impl GlslOptions {
    /// GLSL ES at the given version.
    pub fn es(major_version: u32, minor_version: u32) -> Self {
        GlslOptions {
            standard: GlslStandard::Es,
            major_version,
            minor_version,
        }
    }

    #[inline]
    pub fn is_es(&self) -> bool {
        self.standard == GlslStandard::Es
    }

    #[inline]
    fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major_version, self.minor_version) >= (major, minor)
    }

    /// Whether `layout(binding = N)` is available: desktop 4.2 or ES 3.1.
    pub fn supports_binding_qualifier(&self) -> bool {
        if self.is_es() {
            self.at_least(3, 1)
        } else {
            self.at_least(4, 2)
        }
    }

    /// Whether varyings may carry `layout(location = N)`: desktop 4.1 or
    /// ES 3.1. Earlier versions only allow it on vertex inputs and fragment
    /// outputs and link varyings by name.
    pub fn locations_on_all_interfaces(&self) -> bool {
        if self.is_es() {
            self.at_least(3, 1)
        } else {
            self.at_least(4, 1)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MslOptions {
    /// Accepted for caller compatibility. Resources are always emitted as
    /// individual entry parameters, so this has no effect on the output.
    pub use_arguments_buffer: bool,
    pub msl_version_major: u32,
    pub msl_version_minor: u32,
    /// Buffers below this slot are left to vertex buffers.
    pub buffer_base_index: u32,
    pub texture_base_index: u32,
    pub sampler_base_index: u32,
}

impl Default for MslOptions {
    fn default() -> Self {
        MslOptions {
            use_arguments_buffer: false,
            msl_version_major: 2,
            msl_version_minor: 3,
            buffer_base_index: 2,
            texture_base_index: 0,
            sampler_base_index: 0,
        }
    }
}

impl MslOptions {
    /// Whether `[[vertex]]`/`[[fragment]]` attribute syntax is available.
    pub fn supports_stage_attributes(&self) -> bool {
        (self.msl_version_major, self.msl_version_minor) >= (2, 3)
    }
}

/// Next free slot per resource category.
///
/// MSL reuses `last_ubo_binding` for its buffer slots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompilerContext {
    pub last_ubo_binding: u32,
    pub last_texture_binding: u32,
    pub last_sampler_binding: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let glsl = GlslOptions::default();
        assert_eq!((glsl.standard, glsl.major_version, glsl.minor_version), (GlslStandard::Desktop, 3, 3));
        let msl = MslOptions::default();
        assert_eq!(msl.buffer_base_index, 2);
        assert!(msl.supports_stage_attributes());
        assert_eq!(CompilerContext::default().last_sampler_binding, 0);
    }

    #[test]
    fn test_binding_qualifier_versions() {
        assert!(!GlslOptions::default().supports_binding_qualifier());
        let desktop42 = GlslOptions {
            major_version: 4,
            minor_version: 2,
            ..GlslOptions::default()
        };
        assert!(desktop42.supports_binding_qualifier());
        assert!(!GlslOptions::es(3, 0).supports_binding_qualifier());
        assert!(GlslOptions::es(3, 1).supports_binding_qualifier());
    }

    #[test]
    fn test_varying_location_versions() {
        assert!(!GlslOptions::default().locations_on_all_interfaces());
        let desktop41 = GlslOptions {
            major_version: 4,
            minor_version: 1,
            ..GlslOptions::default()
        };
        assert!(desktop41.locations_on_all_interfaces());
        assert!(!GlslOptions::es(3, 0).locations_on_all_interfaces());
        assert!(GlslOptions::es(3, 2).locations_on_all_interfaces());
    }

    #[test]
    fn test_msl_stage_attribute_versions() {
        let old = MslOptions {
            msl_version_major: 2,
            msl_version_minor: 2,
            ..MslOptions::default()
        };
        assert!(!old.supports_stage_attributes());
        let three = MslOptions {
            msl_version_major: 3,
            msl_version_minor: 0,
            ..MslOptions::default()
        };
        assert!(three.supports_stage_attributes());
    }
}
