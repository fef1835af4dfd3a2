use crate::components::AnimationClip;

#[derive(Clone)]
pub struct AnimationClipNode {
    pub id: i32,
    pub clip: AnimationClip,
}
