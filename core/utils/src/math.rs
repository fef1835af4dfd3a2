use cgmath::Vector3 as cg_Vector3;

pub type Vector3 = cg_Vector3<f32>;
