/// Terminal driver for the transform stack
///
/// Walks a small articulated arm through push/apply/pop and reports the
/// committed model matrix of every joint, plus where its origin lands in
/// normalized device coordinates.
use mstack_core::{perspective, Matrix, Result, Transform, TransformStack};

pub mod printer;

pub use printer::MatrixPrinter;

/// One node of the demo hierarchy, in its parent's space
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: &'static str,
    pub translation: [f32; 3],
    /// Euler angles in radians
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub children: Vec<Joint>,
}

impl Joint {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            children: Vec::new(),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = [x, y, z];
        self
    }

    pub fn turned(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = [x, y, z];
        self
    }

    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = [x, y, z];
        self
    }

    pub fn with_child(mut self, child: Joint) -> Self {
        self.children.push(child);
        self
    }
}

/// What the walk observed at one joint
#[derive(Debug, Clone)]
pub struct JointReport {
    pub name: &'static str,
    pub depth: usize,
    pub model: Matrix,
    /// Joint origin in world space
    pub origin: [f32; 3],
    /// Joint origin after projection and perspective divide
    pub ndc: Option<[f32; 3]>,
}

/// An arm that yaws at the base, with a forearm and a two-fingered hand
pub fn demo_arm(base_yaw: f32) -> Joint {
    let quarter = std::f32::consts::FRAC_PI_4;

    Joint::new("base").turned(0.0, base_yaw, 0.0).with_child(
        Joint::new("shoulder")
            .at(0.0, 1.0, 0.0)
            .turned(0.0, 0.0, quarter)
            .with_child(
                Joint::new("elbow")
                    .at(2.0, 0.0, 0.0)
                    .turned(0.0, 0.0, -quarter)
                    .with_child(
                        Joint::new("wrist")
                            .at(1.5, 0.0, 0.0)
                            .scaled(0.5, 0.5, 0.5)
                            .with_child(Joint::new("finger_upper").at(1.0, 0.25, 0.0))
                            .with_child(Joint::new("finger_lower").at(1.0, -0.25, 0.0)),
                    ),
            ),
    )
}

/// Runs a hierarchy through a transform stack
pub struct ArmDemo {
    stack: TransformStack,
    view: Matrix,
    projection: Matrix,
}

impl ArmDemo {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let aspect = width as f32 / height.max(1) as f32;

        Ok(Self {
            stack: TransformStack::new(),
            view: Transform::translation_matrix(0.0, -1.5, -8.0),
            projection: perspective(60.0, aspect, 0.1, 100.0)?,
        })
    }

    pub fn stack(&self) -> &TransformStack {
        &self.stack
    }

    /// Depth-first walk; every joint is visited inside its own push/pop
    pub fn walk(&mut self, root: &Joint) -> Result<Vec<JointReport>> {
        let camera = Camera {
            view: &self.view,
            projection: &self.projection,
        };
        let mut reports = Vec::new();
        visit(&mut self.stack, &camera, root, &mut reports)?;
        log::debug!("walked {} joints", reports.len());
        Ok(reports)
    }
}

struct Camera<'a> {
    view: &'a Matrix,
    projection: &'a Matrix,
}

fn visit(
    stack: &mut TransformStack,
    camera: &Camera<'_>,
    joint: &Joint,
    reports: &mut Vec<JointReport>,
) -> Result<()> {
    let mut scope = stack.scoped()?;

    let [tx, ty, tz] = joint.translation;
    let [rx, ry, rz] = joint.rotation;
    let [sx, sy, sz] = joint.scale;
    scope.set_translation(tx, ty, tz);
    scope.set_rotation(rx, ry, rz);
    scope.set_scale(sx, sy, sz);
    scope.apply_transform();

    let model = scope.copy_top();
    let origin = Transform::transform_point(&model, [0.0, 0.0, 0.0, 1.0]);
    let mvp = Transform::mvp_matrix(&model, camera.view, camera.projection);
    let clip = Transform::transform_point(&mvp, [0.0, 0.0, 0.0, 1.0]);

    // Prevent division by near-zero w
    let ndc = if clip[3].abs() < 1e-6 {
        None
    } else {
        Some([clip[0] / clip[3], clip[1] / clip[3], clip[2] / clip[3]])
    };

    reports.push(JointReport {
        name: joint.name,
        depth: scope.size() - 1,
        model,
        origin: [origin[0], origin[1], origin[2]],
        ndc,
    });

    for child in &joint.children {
        visit(&mut scope, camera, child, reports)?;
    }
    Ok(())
}
