//! Descriptions of the available samples: their window title, files and the
//! extensions they rely on.

use std::fmt;
use std::str::FromStr;

use crate::extensions::{GlVersion, Requirement};
use crate::shader::StageRetention;
use crate::source::StageFiles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// A textured quad through ARB assembly vertex and fragment programs.
    SimpleVs2ps,
    /// Normal-mapped quad lit by a movable point light, in GLSL.
    BumpMapping,
    /// A cube scene shadowed through a shadow map rendered into a framebuffer object.
    ShadowMapping,
}

pub const VERTEX_PROGRAM: Requirement = Requirement::extension("GL_ARB_vertex_program");
pub const FRAGMENT_PROGRAM: Requirement = Requirement::extension("GL_ARB_fragment_program");
pub const SHADING_LANGUAGE: Requirement =
    Requirement::core_since("GL_ARB_shading_language_100", GlVersion::new(2, 0));
pub const SHADER_OBJECTS: Requirement =
    Requirement::core_since("GL_ARB_shader_objects", GlVersion::new(2, 0));
pub const FRAMEBUFFER_OBJECT: Requirement =
    Requirement::core_since("GL_EXT_framebuffer_object", GlVersion::new(3, 0));

impl SampleKind {
    pub const ALL: [SampleKind; 3] = [
        SampleKind::SimpleVs2ps,
        SampleKind::BumpMapping,
        SampleKind::ShadowMapping,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SampleKind::SimpleVs2ps => "simple-vs2ps",
            SampleKind::BumpMapping => "bump-mapping",
            SampleKind::ShadowMapping => "shadow-mapping",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SampleKind::SimpleVs2ps => {
                "OpenGL - Simple Vertex & Pixel Shader Using \
                 ARB_vertex_program & ARB_fragment_program"
            }
            SampleKind::BumpMapping => "OpenGL - Simple Bump Mapping Using GLslang",
            SampleKind::ShadowMapping => {
                "OpenGL - Simple Shadow Mapping Using a Frame Buffer Object"
            }
        }
    }

    /// Directory under the asset root holding this sample's files.
    pub fn asset_subdir(self) -> &'static str {
        match self {
            SampleKind::SimpleVs2ps => "simple_vs2ps",
            SampleKind::BumpMapping => "bump_mapping",
            SampleKind::ShadowMapping => "shadow_mapping",
        }
    }

    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            SampleKind::SimpleVs2ps => &[VERTEX_PROGRAM, FRAGMENT_PROGRAM],
            SampleKind::BumpMapping => &[SHADING_LANGUAGE, SHADER_OBJECTS],
            SampleKind::ShadowMapping => &[FRAMEBUFFER_OBJECT, SHADING_LANGUAGE, SHADER_OBJECTS],
        }
    }

    /// Stage retention used when the configuration does not pick one.
    pub fn default_retention(self) -> StageRetention {
        match self {
            SampleKind::BumpMapping => StageRetention::RetainUntilDelete,
            SampleKind::SimpleVs2ps | SampleKind::ShadowMapping => StageRetention::DeleteAfterLink,
        }
    }
}

pub mod files {
    //! Fixed file names of each sample.

    use super::StageFiles;

    pub const ARB_PROGRAMS: StageFiles = StageFiles {
        vertex: "vertex_shader.txt",
        fragment: "pixel_shader.txt",
    };
    pub const ARB_TEXTURE: &str = "test.bmp";

    pub const BUMP_PROGRAM: StageFiles = StageFiles {
        vertex: "vertex_shader.vert",
        fragment: "fragment_shader.frag",
    };
    pub const PLAIN_PROGRAM: StageFiles = StageFiles {
        vertex: "plain.vert",
        fragment: "plain.frag",
    };
    pub const MARKER_PROGRAM: StageFiles = StageFiles {
        vertex: "marker.vert",
        fragment: "marker.frag",
    };
    pub const STONE_WALL: &str = "stone_wall.bmp";
    pub const STONE_WALL_NORMALS: &str = "stone_wall_normal_map.bmp";

    pub const SHADOW_PROGRAM: StageFiles = StageFiles {
        vertex: "shadow.vert",
        fragment: "shadow.frag",
    };
    pub const LIGHTING_PROGRAM: StageFiles = StageFiles {
        vertex: "lighting.vert",
        fragment: "lighting.frag",
    };
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SampleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = SampleKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown sample '{s}', expected one of: {}", names.join(", "))
            })
    }
}
