//=========================================================================
// Scene Stack
//=========================================================================
//
// Ordered collection of boxed scenes. The last entry is the active scene;
// every other entry is suspended (neither simulated nor rendered) and
// keeps its state for when it is exposed again.
//
// Only the engine loop mutates the stack.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::Scene;

//=== Scene Stack =========================================================

/// Stack of scenes, top = last = active.
pub struct SceneStack<S> {
    scenes: Vec<Box<dyn Scene<S>>>,
}

impl<S> SceneStack<S> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { scenes: Vec::new() }
    }

    //--- Stack Operations -------------------------------------------------

    /// Pushes `scene`, making it the active scene.
    pub fn push(&mut self, scene: Box<dyn Scene<S>>) {
        debug!("Pushing scene {} (depth {})", scene.name(), self.scenes.len() + 1);
        self.scenes.push(scene);
    }

    /// Removes and returns the active scene.
    pub fn pop(&mut self) -> Option<Box<dyn Scene<S>>> {
        let scene = self.scenes.pop();
        if let Some(scene) = &scene {
            debug!("Popped scene {} (depth {})", scene.name(), self.scenes.len());
        }
        scene
    }

    /// Drops every scene, top first.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    //--- Queries ----------------------------------------------------------

    /// The active scene, if any.
    pub fn top(&self) -> Option<&dyn Scene<S>> {
        self.scenes.last().map(|scene| scene.as_ref())
    }

    /// The active scene, mutably.
    pub fn top_mut(&mut self) -> Option<&mut (dyn Scene<S> + 'static)> {
        self.scenes.last_mut().map(|scene| scene.as_mut())
    }

    /// Number of scenes, suspended ones included.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Returns `true` if no scene is left.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Scene names, bottom to top.
    pub fn names(&self) -> Vec<&str> {
        self.scenes.iter().map(|scene| scene.name()).collect()
    }
}

impl<S> Default for SceneStack<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for SceneStack<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

//=== Tests ===============================================================
