//! Win32 glue.
//!
//! On Windows the chrome answers `WM_NCHITTEST` with the classic `HT*`
//! codes; this module maps [`MessageResult`] values onto them and reads the
//! frame metrics the window manager adds around maximized windows. An
//! embedder that owns the window procedure forwards `WM_NCHITTEST` to
//! [`GoodWindow::nc_hit_test`].

use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, HTBOTTOM, HTBOTTOMLEFT, HTBOTTOMRIGHT, HTCAPTION, HTCLIENT, HTCLOSE,
    HTLEFT, HTMAXBUTTON, HTMINBUTTON, HTNOWHERE, HTRIGHT, HTSYSMENU, HTTOP, HTTOPLEFT,
    HTTOPRIGHT, HTTRANSPARENT, SM_CXPADDEDBORDER, SM_CXSIZEFRAME,
};

use crate::GoodWindow;
use crate::geometry::Point;
use crate::hit_test::RegionCode;
use crate::message::{MessageResult, PlatformMessage};

/// The `WM_NCHITTEST` return value for a region.
///
/// `Nowhere` means "the client handles it" and maps to `HTCLIENT`;
/// `Elsewhere` maps to `HTNOWHERE`.
pub fn ht_code(region: RegionCode) -> i32 {
    let code = match region {
        RegionCode::TopLeft => HTTOPLEFT,
        RegionCode::Top => HTTOP,
        RegionCode::TopRight => HTTOPRIGHT,
        RegionCode::Left => HTLEFT,
        RegionCode::Right => HTRIGHT,
        RegionCode::BottomLeft => HTBOTTOMLEFT,
        RegionCode::Bottom => HTBOTTOM,
        RegionCode::BottomRight => HTBOTTOMRIGHT,
        RegionCode::Caption => HTCAPTION,
        RegionCode::SystemMenu => HTSYSMENU,
        RegionCode::Minimize => HTMINBUTTON,
        RegionCode::Maximize => HTMAXBUTTON,
        RegionCode::Close => HTCLOSE,
        RegionCode::Nowhere => HTCLIENT,
        RegionCode::Elsewhere => HTNOWHERE,
    };
    code as i32
}

/// The `WM_NCHITTEST` return value for a procedure result, if it is one.
pub fn hit_test_result(result: MessageResult) -> Option<i32> {
    match result {
        MessageResult::HitTest(region) => Some(ht_code(region)),
        MessageResult::Transparent => Some(HTTRANSPARENT as i32),
        MessageResult::Handled | MessageResult::Ignored => None,
    }
}

/// Thickness of the invisible resize frame Windows keeps around a
/// maximized window.
pub fn maximized_frame_border() -> i32 {
    // SAFETY: GetSystemMetrics has no preconditions.
    unsafe { GetSystemMetrics(SM_CXSIZEFRAME) + GetSystemMetrics(SM_CXPADDEDBORDER) }
}

impl GoodWindow {
    /// Answer `WM_NCHITTEST` for a physical screen point. `from_child` is set
    /// when the query was forwarded by an embedded child window.
    pub fn nc_hit_test(&self, point: Point, from_child: bool) -> i32 {
        let result = self.handle_message(PlatformMessage::HitTest { point, from_child });
        hit_test_result(result).unwrap_or(HTNOWHERE as i32)
    }
}
