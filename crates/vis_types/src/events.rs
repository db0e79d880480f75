//! Network Events
//!
//! Names of the events a vis-network instance emits. The wire form is the
//! exact string passed to `network.on(..)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown event name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown network event: {0}")]
pub struct UnknownEvent(pub String);

macro_rules! network_events {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// An event emitted by the embedded network
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum NetworkEvent {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl NetworkEvent {
            /// Every known event, in declaration order
            pub const ALL: &'static [NetworkEvent] = &[$(NetworkEvent::$variant),*];

            /// The event name as used by vis-network
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(NetworkEvent::$variant => $name,)*
                }
            }
        }

        impl FromStr for NetworkEvent {
            type Err = UnknownEvent;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(NetworkEvent::$variant),)*
                    other => Err(UnknownEvent(other.to_string())),
                }
            }
        }
    };
}

network_events! {
    Click => "click",
    DoubleClick => "doubleClick",
    OnContext => "oncontext",
    Hold => "hold",
    Release => "release",
    Select => "select",
    SelectNode => "selectNode",
    SelectEdge => "selectEdge",
    DeselectNode => "deselectNode",
    DeselectEdge => "deselectEdge",
    DragStart => "dragStart",
    Dragging => "dragging",
    DragEnd => "dragEnd",
    ControlNodeDragging => "controlNodeDragging",
    ControlNodeDragEnd => "controlNodeDragEnd",
    HoverNode => "hoverNode",
    BlurNode => "blurNode",
    HoverEdge => "hoverEdge",
    BlurEdge => "blurEdge",
    Zoom => "zoom",
    ShowPopup => "showPopup",
    HidePopup => "hidePopup",
    StartStabilizing => "startStabilizing",
    StabilizationProgress => "stabilizationProgress",
    StabilizationIterationsDone => "stabilizationIterationsDone",
    Stabilized => "stabilized",
    Resize => "resize",
    InitRedraw => "initRedraw",
    BeforeDrawing => "beforeDrawing",
    AfterDrawing => "afterDrawing",
    AnimationFinished => "animationFinished",
    ConfigChange => "configChange",
}

impl fmt::Display for NetworkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
